// src/process/writer.rs

//! Stdin writer task for interactive solver runs.

use tokio::io::AsyncWriteExt;
use tokio::process::ChildStdin;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// One message on the stdin command queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueMessage {
    /// A command line to write to the process input, terminator appended.
    Command(String),
    /// Sentinel that ends the writer loop. It does not kill the process;
    /// the payload is still written so the solver can exit on its own.
    Exit(String),
}

/// Spawn the writer task that drains `rx` into the child's stdin.
///
/// The loop ends on the [`QueueMessage::Exit`] sentinel, on queue closure
/// (all senders dropped), or on a write failure (dead child). Messages are
/// written in dequeue order, one line each.
pub(crate) fn spawn_stdin_writer(
    command: String,
    mut stdin: ChildStdin,
    mut rx: mpsc::Receiver<QueueMessage>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let (payload, last) = match msg {
                QueueMessage::Command(p) => (p, false),
                QueueMessage::Exit(p) => (p, true),
            };
            debug!(command = %command, payload = %payload, "writing command to solver stdin");
            if let Err(e) = write_line(&mut stdin, &payload).await {
                warn!(command = %command, error = %e, "stdin write failed; stopping writer");
                break;
            }
            if last {
                debug!(command = %command, "exit sentinel dequeued; stdin writer stopping");
                break;
            }
        }
        debug!(command = %command, "stdin writer finished");
    })
}

async fn write_line(stdin: &mut ChildStdin, payload: &str) -> std::io::Result<()> {
    stdin.write_all(payload.as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    stdin.flush().await
}
