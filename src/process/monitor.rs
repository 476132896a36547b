// src/process/monitor.rs

//! Line recognition on solver output streams.
//!
//! One reader task per monitored stream consumes lines as they appear,
//! tests each against a [`Recognizer`], and forwards hits in stream order
//! into an unbounded extraction queue. The polling caller is the queue's
//! only consumer.

use std::time::Duration;

use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

/// Recognition rule applied to every line of a monitored stream.
#[derive(Debug, Clone)]
pub enum Recognizer {
    /// Every line is a signal (dynamic-mode step completion).
    AnyLine,
    /// Every non-empty line is a signal (error stream).
    NonEmpty,
    /// Lines matching the pattern are signals.
    Matches(Regex),
}

impl Recognizer {
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Recognizer::AnyLine => true,
            Recognizer::NonEmpty => !line.trim().is_empty(),
            Recognizer::Matches(re) => re.is_match(line),
        }
    }
}

/// Consumer end of one stream's extraction queue.
///
/// Raw line text is preserved; interpreting it (e.g. pulling out the step
/// number) is up to the caller.
pub struct ResponseMonitor {
    extracted: mpsc::UnboundedReceiver<String>,
}

impl ResponseMonitor {
    /// Attach to a line-producing stream, spawning its reader task.
    ///
    /// The reader runs until the stream closes (process exit or abort) and
    /// consumes every line either way, so OS pipe buffers never fill.
    pub fn attach<R>(stream: R, recognizer: Recognizer) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            let reader = BufReader::new(stream);
            let mut lines = reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if recognizer.matches(&line) {
                    // Send only fails when the monitor was dropped; the
                    // reader keeps draining the stream regardless.
                    let _ = tx.send(line);
                }
            }
            debug!("stream monitor ended");
        });

        Self { extracted: rx }
    }

    /// Oldest unread recognized line, waiting up to `timeout`.
    ///
    /// This is the only blocking operation exposed to the caller; the bound
    /// keeps a surrounding real-time loop from stalling indefinitely. There
    /// is no cross-call watchdog: a solver that never answers is the
    /// wrapping system's problem to detect.
    pub async fn poll(&mut self, timeout: Duration) -> Option<String> {
        tokio::time::timeout(timeout, self.extracted.recv())
            .await
            .ok()
            .flatten()
    }

    /// Zero-wait variant of [`Self::poll`] for tight check loops.
    pub fn try_poll(&mut self) -> Option<String> {
        self.extracted.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_recognizer_skips_blank_lines() {
        let r = Recognizer::NonEmpty;
        assert!(!r.matches(""));
        assert!(!r.matches("   \t"));
        assert!(r.matches("segmentation fault"));
    }

    #[test]
    fn regex_recognizer_matches_step_lines() {
        let r = Recognizer::Matches(Regex::new(r"^Step \d+ done").unwrap());
        assert!(r.matches("Step 12 done"));
        assert!(!r.matches("loading model"));
    }

    #[tokio::test]
    async fn recognized_lines_arrive_in_stream_order() {
        let input: &[u8] = b"first\n\nsecond\n";
        let mut monitor = ResponseMonitor::attach(input, Recognizer::NonEmpty);
        assert_eq!(
            monitor.poll(Duration::from_secs(1)).await.as_deref(),
            Some("first")
        );
        assert_eq!(
            monitor.poll(Duration::from_secs(1)).await.as_deref(),
            Some("second")
        );
        assert_eq!(monitor.poll(Duration::from_millis(50)).await, None);
    }

    #[tokio::test]
    async fn try_poll_is_zero_wait() {
        let input: &[u8] = b"";
        let mut monitor = ResponseMonitor::attach(input, Recognizer::AnyLine);
        assert_eq!(monitor.try_poll(), None);
    }
}
