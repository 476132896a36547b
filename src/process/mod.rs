// src/process/mod.rs

//! Process lifecycle and inter-process messaging.
//!
//! - [`handle`]: ownership of one external solver process (spawn, liveness,
//!   forcible termination) and its piped stdio streams.
//! - [`writer`]: the stdin writer task that drains a command queue into a
//!   live process, one line per message.
//! - [`monitor`]: stream-reader tasks that recognize lines on stdout/stderr
//!   and forward them into single-consumer extraction queues.

pub mod handle;
pub mod monitor;
pub mod writer;

pub use handle::{ProcessHandle, StdinProcessHandle};
pub use monitor::{Recognizer, ResponseMonitor};
pub use writer::QueueMessage;
