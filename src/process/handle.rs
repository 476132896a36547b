// src/process/handle.rs

//! Handles owning one external solver process.
//!
//! [`ProcessHandle`] is the plain variant used for static one-shot runs.
//! [`StdinProcessHandle`] composes a `ProcessHandle` with a bounded command
//! queue and a dedicated writer task for interactive step-by-step runs.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::errors::{FemExecError, Result};
use crate::process::writer::{self, QueueMessage};

/// Default interval callers use between liveness/response polls.
const DEFAULT_WAIT_MS: u64 = 2000;

/// Capacity of the stdin command queue. One outstanding step command at a
/// time is the expected discipline, so this never fills in practice.
const COMMAND_QUEUE_CAPACITY: usize = 32;

/// Owns one external OS process: spawn, forcible termination, non-blocking
/// liveness queries, and hand-out of the piped stdout/stderr streams.
///
/// A handle is exclusively owned by one coordinator or executor; it is never
/// shared between two owners.
pub struct ProcessHandle {
    command: String,
    args: Vec<String>,
    work_dir: Option<PathBuf>,
    wait: Duration,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
    exited: bool,
}

impl ProcessHandle {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            work_dir: None,
            wait: Duration::from_millis(DEFAULT_WAIT_MS),
            child: None,
            stdout: None,
            stderr: None,
            exited: false,
        }
    }

    /// Set the working directory the process is launched in.
    pub fn set_work_dir(&mut self, dir: impl AsRef<Path>) {
        self.work_dir = Some(dir.as_ref().to_path_buf());
    }

    pub fn set_wait(&mut self, wait: Duration) {
        self.wait = wait;
    }

    /// Suggested interval between polls of this handle.
    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Launch the process.
    ///
    /// On failure no child exists: [`Self::is_alive`] reports false and
    /// [`Self::has_exited`] reports true from then on.
    pub fn start(&mut self) -> Result<()> {
        self.spawn(false)
    }

    pub(crate) fn spawn(&mut self, pipe_stdin: bool) -> Result<()> {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if pipe_stdin {
            cmd.stdin(Stdio::piped());
        }
        if let Some(ref dir) = self.work_dir {
            cmd.current_dir(dir);
        }

        debug!(
            command = %self.command,
            args = ?self.args,
            work_dir = ?self.work_dir,
            "starting solver process"
        );

        let mut child = cmd.spawn().map_err(|e| FemExecError::LaunchFailure {
            command: self.command.clone(),
            source: e,
        })?;

        self.stdout = child.stdout.take();
        self.stderr = child.stderr.take();
        self.child = Some(child);
        self.exited = false;
        Ok(())
    }

    /// Non-blocking liveness query based on the exit-code check.
    ///
    /// Latches: once the process is observed to have exited, subsequent
    /// calls keep reporting true. A handle that was never (successfully)
    /// started also reports true, i.e. "not alive".
    pub fn has_exited(&mut self) -> bool {
        if self.exited {
            return true;
        }
        let Some(child) = self.child.as_mut() else {
            return true;
        };
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(command = %self.command, ?status, "solver process exited");
                self.exited = true;
                true
            }
            Ok(None) => false,
            Err(e) => {
                // Treat an unanswerable exit query as process death.
                warn!(command = %self.command, error = %e, "exit-code query failed");
                self.exited = true;
                true
            }
        }
    }

    /// True while a launched process has not been observed to exit.
    pub fn is_alive(&mut self) -> bool {
        self.child.is_some() && !self.has_exited()
    }

    /// Forcibly terminate the process.
    ///
    /// Safe to call before start, while running, and after natural exit;
    /// failures are logged, never raised. Stream-reader tasks observe the
    /// stream closure and finish on their own.
    pub async fn abort(&mut self) {
        if let Some(child) = self.child.as_mut() {
            if let Err(e) = child.kill().await {
                debug!(command = %self.command, error = %e, "kill on abort failed (process likely already gone)");
            }
            self.exited = true;
        }
    }

    /// Hand out the piped stdout stream. Yields `Some` exactly once per
    /// started process.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.stdout.take()
    }

    /// Hand out the piped stderr stream. Yields `Some` exactly once per
    /// started process.
    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.stderr.take()
    }
}

/// Interactive variant of [`ProcessHandle`] for dynamic (step-by-step) runs.
///
/// Owns a bounded command queue drained by a dedicated writer task into the
/// child's stdin for the lifetime of the process. [`QueueMessage::Exit`] is a
/// sentinel that ends the writer loop without killing the process, letting
/// the solver shut down on its own command.
pub struct StdinProcessHandle {
    handle: ProcessHandle,
    commands: Option<mpsc::Sender<QueueMessage>>,
    writer: Option<tokio::task::JoinHandle<()>>,
}

impl StdinProcessHandle {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            handle: ProcessHandle::new(command, args),
            commands: None,
            writer: None,
        }
    }

    pub fn set_work_dir(&mut self, dir: impl AsRef<Path>) {
        self.handle.set_work_dir(dir);
    }

    pub fn set_wait(&mut self, wait: Duration) {
        self.handle.set_wait(wait);
    }

    /// Launch the process with stdin piped and spawn the stdin writer task.
    pub fn start(&mut self) -> Result<()> {
        self.handle.spawn(true)?;
        let stdin = self
            .handle
            .child
            .as_mut()
            .and_then(|c| c.stdin.take())
            .ok_or_else(|| {
                FemExecError::ConfigError(format!(
                    "no stdin pipe available for '{}'",
                    self.handle.command
                ))
            })?;
        let (tx, rx) = mpsc::channel::<QueueMessage>(COMMAND_QUEUE_CAPACITY);
        self.writer = Some(writer::spawn_stdin_writer(
            self.handle.command.clone(),
            stdin,
            rx,
        ));
        self.commands = Some(tx);
        Ok(())
    }

    /// Sender half of the command queue. `None` before a successful start.
    ///
    /// Messages are delivered to the process input in submission order.
    pub fn commands(&self) -> Option<mpsc::Sender<QueueMessage>> {
        self.commands.clone()
    }

    pub fn has_exited(&mut self) -> bool {
        self.handle.has_exited()
    }

    pub fn is_alive(&mut self) -> bool {
        self.handle.is_alive()
    }

    /// Forcibly terminate the process.
    ///
    /// The writer task is never left blocked afterwards. An `Exit` sentinel
    /// is enqueued here so a writer parked on an empty queue wakes and ends
    /// its loop even while callers still hold queue senders; a writer busy
    /// draining a non-empty queue ends on the failed write to the dead
    /// child's stdin instead.
    pub async fn abort(&mut self) {
        self.handle.abort().await;
        if let Some(commands) = self.commands.take() {
            // A full queue means the writer is not parked; it will hit the
            // dead stdin on its next write and stop on its own.
            let _ = commands.try_send(QueueMessage::Exit("EXIT".to_string()));
        }
    }

    /// True once the stdin writer task has ended (or was never started).
    pub fn writer_finished(&self) -> bool {
        self.writer.as_ref().is_none_or(|w| w.is_finished())
    }

    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.handle.take_stdout()
    }

    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.handle.take_stderr()
    }

    pub fn wait(&self) -> Duration {
        self.handle.wait()
    }

    pub fn command(&self) -> &str {
        self.handle.command()
    }
}
