// src/executor.rs

//! Static-mode execution state machine.
//!
//! One [`FemExecutor`] drives one one-shot solver run through a strictly
//! forward-moving state sequence, advanced only from the caller's poll loop.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::output::OutputFileParser;
use crate::process::{ProcessHandle, Recognizer, ResponseMonitor};

/// Fixed displacement result filename under the working directory.
const DISP_FILE: &str = "tmp_disp.out";
/// Fixed force result filename under the working directory.
const FORCE_FILE: &str = "tmp_forc.out";

const DEFAULT_POLL_WAIT_MS: u64 = 2000;

/// Possible execution states, in order. Never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    /// We have not started executing yet.
    NotStarted,
    /// The command is executing.
    Executing,
    /// The command has finished executing.
    ExecutionFinished,
    /// The output files are being parsed.
    ProcessingOutputFiles,
    /// We are done.
    Finished,
}

/// One-shot executor for a solver program in static mode.
///
/// Usage: configure, [`start`](Self::start), then call
/// [`is_done`](Self::is_done) repeatedly at [`wait`](Self::wait) intervals
/// until it returns true; then read [`displacements`](Self::displacements)
/// and [`forces`](Self::forces) if output-file processing was requested.
pub struct FemExecutor {
    command: String,
    filename: String,
    work_dir: PathBuf,
    wait: Duration,
    process_output_files: bool,
    state: ExecutionState,
    handle: Option<ProcessHandle>,
    stdout_monitor: Option<ResponseMonitor>,
    stderr_monitor: Option<ResponseMonitor>,
    output: String,
    disp_parser: Option<OutputFileParser>,
    force_parser: Option<OutputFileParser>,
}

impl FemExecutor {
    /// `command` is the solver executable, `filename` its single argument,
    /// `work_dir` the directory the run happens in.
    pub fn new(
        command: impl Into<String>,
        filename: impl Into<String>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            command: command.into(),
            filename: filename.into(),
            work_dir: work_dir.into(),
            wait: Duration::from_millis(DEFAULT_POLL_WAIT_MS),
            process_output_files: false,
            state: ExecutionState::NotStarted,
            handle: None,
            stdout_monitor: None,
            stderr_monitor: None,
            output: String::new(),
            disp_parser: None,
            force_parser: None,
        }
    }

    /// Request result-file parsing after the process exits.
    pub fn set_process_output_files(&mut self, process: bool) {
        self.process_output_files = process;
    }

    /// Set the suggested poll interval.
    pub fn set_wait(&mut self, wait: Duration) {
        self.wait = wait;
    }

    /// Suggested interval between [`Self::is_done`] polls.
    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    /// Launch the solver process and move to `Executing`.
    ///
    /// On launch failure this returns false and the state stays at
    /// `NotStarted`; no later poll will ever report completion, so callers
    /// must check this result synchronously. That stuck-state behavior is
    /// deliberate: recovery belongs to the caller, not this machine.
    pub fn start(&mut self) -> bool {
        let mut handle = ProcessHandle::new(&self.command, vec![self.filename.clone()]);
        handle.set_work_dir(&self.work_dir);
        handle.set_wait(self.wait);
        if let Err(e) = handle.start() {
            error!(command = %self.command, error = %e, "solver failed to start");
            return false;
        }
        self.stdout_monitor = handle
            .take_stdout()
            .map(|s| ResponseMonitor::attach(s, Recognizer::AnyLine));
        self.stderr_monitor = handle
            .take_stderr()
            .map(|s| ResponseMonitor::attach(s, Recognizer::NonEmpty));
        self.handle = Some(handle);
        self.state = ExecutionState::Executing;
        true
    }

    /// Execution polling function. Call repeatedly inside a polling loop to
    /// advance the run through its states; returns true only once the state
    /// is `Finished`, and keeps returning true afterwards.
    ///
    /// Never blocks: liveness is a `try_wait` query, monitor drains are
    /// zero-wait, and output-file parsing happens in background tasks.
    pub fn is_done(&mut self) -> bool {
        self.drain_monitors();

        if self.state == ExecutionState::Executing {
            let exited = match self.handle.as_mut() {
                Some(h) => h.has_exited(),
                None => false,
            };
            if exited {
                self.state = ExecutionState::ExecutionFinished;
            }
        }
        if self.state == ExecutionState::ExecutionFinished {
            if self.process_output_files {
                debug!(work_dir = %self.work_dir.display(), "starting output file parsing tasks");
                self.disp_parser = Some(OutputFileParser::spawn(self.work_dir.join(DISP_FILE)));
                self.force_parser = Some(OutputFileParser::spawn(self.work_dir.join(FORCE_FILE)));
                self.state = ExecutionState::ProcessingOutputFiles;
            } else {
                self.state = ExecutionState::Finished;
            }
        }
        if self.state == ExecutionState::ProcessingOutputFiles {
            let done = self.disp_parser.as_ref().is_some_and(|p| p.is_done())
                && self.force_parser.as_ref().is_some_and(|p| p.is_done());
            if done {
                self.state = ExecutionState::Finished;
            }
        }

        debug!(state = ?self.state, command = %self.command, "static run state");
        self.state == ExecutionState::Finished
    }

    /// Kill the solver process. Safe at any point in the run.
    pub async fn abort(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            handle.abort().await;
        }
    }

    /// Stdout collected from the run so far, newline separated.
    pub fn output(&mut self) -> &str {
        self.drain_monitors();
        &self.output
    }

    /// The displacements data set. Empty until parsing completed.
    pub fn displacements(&self) -> Vec<Vec<f64>> {
        self.disp_parser.as_ref().map(|p| p.data()).unwrap_or_default()
    }

    /// The forces data set. Empty until parsing completed.
    pub fn forces(&self) -> Vec<Vec<f64>> {
        self.force_parser.as_ref().map(|p| p.data()).unwrap_or_default()
    }

    /// Fold pending monitor output into the collected text / the log.
    fn drain_monitors(&mut self) {
        if let Some(mon) = self.stdout_monitor.as_mut() {
            while let Some(line) = mon.try_poll() {
                if !self.output.is_empty() {
                    self.output.push('\n');
                }
                self.output.push_str(&line);
            }
        }
        if let Some(mon) = self.stderr_monitor.as_mut() {
            while let Some(line) = mon.try_poll() {
                warn!(command = %self.command, "solver stderr: {line}");
            }
        }
    }
}
