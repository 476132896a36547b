// tests/common/mod.rs

#[allow(unused_imports)]
pub use femexec_test_utils::init_tracing;
