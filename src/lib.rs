// src/lib.rs

//! Drive external finite-element solver programs as substructures of a
//! hybrid-simulation test.
//!
//! The crate has two execution styles:
//!
//! - **static**: one-shot runs through [`executor::FemExecutor`], a polled
//!   five-state machine that optionally parses the solver's result files in
//!   the background after exit;
//! - **dynamic**: interactive step-by-step runs through
//!   [`execute::ProcessExecution`], which feeds one command line per step
//!   into the solver's stdin and recognizes step-completion / error lines
//!   on its output streams without ever blocking the caller's poll loop.

pub mod cli;
pub mod config;
pub mod errors;
pub mod execute;
pub mod executor;
pub mod logging;
pub mod output;
pub mod process;

use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::executor::FemExecutor;

/// High-level entry point used by `main.rs`: run one static execution to
/// completion, polling at the configured interval.
pub async fn run(args: CliArgs) -> Result<()> {
    let mut fem = FemExecutor::new(&args.command, &args.filename, &args.work_dir);
    fem.set_process_output_files(args.process_output_files);
    fem.set_wait(Duration::from_millis(args.poll_interval_ms));

    if !fem.start() {
        anyhow::bail!("'{}' failed to start", args.command);
    }

    while !fem.is_done() {
        tokio::time::sleep(fem.wait()).await;
    }

    println!("Output: \"{}\"", fem.output());
    if args.process_output_files {
        let disp = fem.displacements();
        let force = fem.forces();
        info!(
            disp_rows = disp.len(),
            force_rows = force.len(),
            "output files parsed"
        );
        println!("displacements: {} rows", disp.len());
        println!("forces: {} rows", force.len());
    }
    Ok(())
}
