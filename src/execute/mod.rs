// src/execute/mod.rs

//! Execution monitoring for one running solver instance.

pub mod coordinator;
pub mod status;

pub use coordinator::ProcessExecution;
pub use status::ExecutionStatus;
