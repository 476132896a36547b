// src/config/mod.rs

//! Persisted executor configuration.
//!
//! Configurations are stored as flat `key=value` text records (the format
//! inherited from the property files the lab tooling already uses), mapped
//! to the typed objects in [`model`]. [`loader`] is lenient on load:
//! malformed fields are logged and skipped, and the partially-filled record
//! is kept for the caller to validate.

pub mod codec;
pub mod loader;
pub mod model;
pub mod properties;

pub use loader::{load_config, save_config};
pub use model::{
    DimensionType, DispDof, FemExecutorConfig, FemProgram, ProgramConfig, SubstructureConfig,
};
