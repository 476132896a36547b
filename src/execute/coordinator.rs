// src/execute/coordinator.rs

//! Coordinator binding one solver process to its two stream monitors.

use std::path::Path;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::config::model::ProgramConfig;
use crate::execute::status::ExecutionStatus;
use crate::process::{ProcessHandle, QueueMessage, Recognizer, ResponseMonitor, StdinProcessHandle};

enum ProcessVariant {
    /// One-shot run, no stdin queue.
    Static(ProcessHandle),
    /// Interactive run fed one command line per step.
    Dynamic(StdinProcessHandle),
}

/// Manages and monitors the execution of one FEM solver instance.
///
/// Binds one process handle (static or dynamic variant) with a stdout
/// monitor (step-completion signals) and a stderr monitor (error signals),
/// and exposes idempotent, zero-wait check operations that fold monitor
/// output into an [`ExecutionStatus`].
///
/// Caller discipline, documented rather than enforced: submit at most one
/// outstanding step command at a time, and call
/// [`ExecutionStatus::reset_step_executed`] before submitting the next step.
pub struct ProcessExecution {
    process: ProcessVariant,
    stdout_monitor: Option<ResponseMonitor>,
    stderr_monitor: Option<ResponseMonitor>,
    statuses: ExecutionStatus,
}

impl ProcessExecution {
    /// Build a coordinator for `program`, run in `work_dir`.
    ///
    /// `dynamic` selects the stdin-capable handle variant; `wait` is the
    /// suggested interval between response polls.
    pub fn new(
        program: &ProgramConfig,
        work_dir: impl AsRef<Path>,
        wait: Duration,
        dynamic: bool,
    ) -> Self {
        let args = vec![program.program.to_string()];
        let process = if dynamic {
            let mut handle = StdinProcessHandle::new(&program.executable_path, args);
            handle.set_work_dir(&work_dir);
            handle.set_wait(wait);
            ProcessVariant::Dynamic(handle)
        } else {
            let mut handle = ProcessHandle::new(&program.executable_path, args);
            handle.set_work_dir(&work_dir);
            handle.set_wait(wait);
            ProcessVariant::Static(handle)
        };
        Self {
            process,
            stdout_monitor: None,
            stderr_monitor: None,
            statuses: ExecutionStatus::new(),
        }
    }

    /// Launch the process and attach both stream monitors.
    ///
    /// Returns false on launch failure, in which case no monitors exist and
    /// the coordinator is unusable; the caller may retry by reconstructing
    /// it. There is no internal retry.
    pub fn start(&mut self) -> bool {
        let started = match &mut self.process {
            ProcessVariant::Static(h) => h.start(),
            ProcessVariant::Dynamic(h) => h.start(),
        };
        if let Err(e) = started {
            error!(command = %self.command(), error = %e, "solver failed to start");
            return false;
        }

        let (stdout, stderr) = match &mut self.process {
            ProcessVariant::Static(h) => (h.take_stdout(), h.take_stderr()),
            ProcessVariant::Dynamic(h) => (h.take_stdout(), h.take_stderr()),
        };
        self.stdout_monitor = stdout.map(|s| ResponseMonitor::attach(s, Recognizer::AnyLine));
        self.stderr_monitor = stderr.map(|s| ResponseMonitor::attach(s, Recognizer::NonEmpty));
        true
    }

    /// Latch `process_died` once the handle's exit-code query reports exit.
    /// No-op after the latch is set.
    pub fn check_if_process_is_alive(&mut self) {
        if self.statuses.process_died() {
            return;
        }
        let exited = match &mut self.process {
            ProcessVariant::Static(h) => h.has_exited(),
            ProcessVariant::Dynamic(h) => h.has_exited(),
        };
        if exited {
            self.statuses.record_process_death();
        }
    }

    /// Latch `step_executed` on a recognized stdout line, remembering the
    /// raw text. No-op while the latch from the previous step is still set.
    pub fn check_step_completion(&mut self) {
        if self.statuses.step_executed() {
            return;
        }
        let Some(monitor) = self.stdout_monitor.as_mut() else {
            return;
        };
        if let Some(step) = monitor.try_poll() {
            debug!(command = %self.command(), step = %step, "solver reported step completion");
            self.statuses.record_step(step);
        }
    }

    /// Latch `process_errored` on any recognized stderr line.
    ///
    /// Errors are observational: the line is logged, the process keeps
    /// running, and deciding to abort is up to the caller.
    pub fn check_for_errors(&mut self) {
        if self.statuses.process_died() {
            return;
        }
        let Some(monitor) = self.stderr_monitor.as_mut() else {
            return;
        };
        if let Some(line) = monitor.try_poll() {
            self.statuses.record_error();
            error!(command = %self.command(), "solver stderr: {line}");
        }
    }

    /// Sender half of the stdin command queue (dynamic variant after a
    /// successful start, `None` otherwise).
    pub fn commands(&self) -> Option<mpsc::Sender<QueueMessage>> {
        match &self.process {
            ProcessVariant::Static(_) => None,
            ProcessVariant::Dynamic(h) => h.commands(),
        }
    }

    /// Kill the process. The caller invokes this when the test run ends or
    /// a fatal condition (death, repeated errors) has been detected.
    pub async fn abort(&mut self) {
        match &mut self.process {
            ProcessVariant::Static(h) => h.abort().await,
            ProcessVariant::Dynamic(h) => h.abort().await,
        }
    }

    /// Stdout monitor for callers that want a bounded wait on the next
    /// recognized response rather than the zero-wait check.
    pub fn stdout_monitor(&mut self) -> Option<&mut ResponseMonitor> {
        self.stdout_monitor.as_mut()
    }

    pub fn statuses(&self) -> &ExecutionStatus {
        &self.statuses
    }

    pub fn statuses_mut(&mut self) -> &mut ExecutionStatus {
        &mut self.statuses
    }

    fn command(&self) -> &str {
        match &self.process {
            ProcessVariant::Static(h) => h.command(),
            ProcessVariant::Dynamic(h) => h.command(),
        }
    }
}
