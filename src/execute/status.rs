// src/execute/status.rs

//! Latched execution status for one solver instance.

/// Mutable status record updated only by the polling caller.
///
/// The boolean fields are latches: they move false→true at most once and are
/// never reset internally. `step_executed` is the one exception the *caller*
/// resets, explicitly, before submitting the next step command.
#[derive(Debug, Default)]
pub struct ExecutionStatus {
    process_died: bool,
    process_errored: bool,
    step_executed: bool,
    last_step: Option<String>,
}

impl ExecutionStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_died(&self) -> bool {
        self.process_died
    }

    pub fn process_errored(&self) -> bool {
        self.process_errored
    }

    pub fn step_executed(&self) -> bool {
        self.step_executed
    }

    /// Raw text of the most recently recognized step-completion line.
    pub fn last_step(&self) -> Option<&str> {
        self.last_step.as_deref()
    }

    /// Latch process death.
    pub fn record_process_death(&mut self) {
        self.process_died = true;
    }

    /// Latch the presence of error-stream output.
    pub fn record_error(&mut self) {
        self.process_errored = true;
    }

    /// Latch step completion and remember the response text.
    pub fn record_step(&mut self, step: String) {
        self.step_executed = true;
        self.last_step = Some(step);
    }

    /// Caller-side reset before submitting the next step command.
    pub fn reset_step_executed(&mut self) {
        self.step_executed = false;
    }
}
