// src/output/mod.rs

//! Background parsing of solver result files.

pub mod parser;

pub use parser::OutputFileParser;
