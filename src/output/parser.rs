// src/output/parser.rs

//! Result-file parsing as an independent background task.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, error};

/// Parses one result file (displacement or force matrix) in the background.
///
/// Spawning two of these lets displacement and force files be parsed
/// concurrently after the solver exits. Completion is exposed as a
/// non-blocking flag; on read or parse failure the task still completes,
/// with an empty matrix and a logged diagnostic, so nothing ever propagates
/// into the polling loop.
pub struct OutputFileParser {
    path: PathBuf,
    result: Arc<OnceLock<Vec<Vec<f64>>>>,
}

impl OutputFileParser {
    /// Spawn the parsing task for `path`.
    pub fn spawn(path: PathBuf) -> Self {
        let result: Arc<OnceLock<Vec<Vec<f64>>>> = Arc::new(OnceLock::new());
        let slot = Arc::clone(&result);
        let task_path = path.clone();

        tokio::spawn(async move {
            let matrix = match read_and_parse(&task_path).await {
                Ok(m) => {
                    debug!(path = %task_path.display(), rows = m.len(), "output file parsed");
                    m
                }
                Err(e) => {
                    error!(path = %task_path.display(), error = %e, "output file parse failed");
                    Vec::new()
                }
            };
            // Only this task sets the slot; a second set cannot happen.
            let _ = slot.set(matrix);
        });

        Self { path, result }
    }

    /// Non-blocking completion flag.
    pub fn is_done(&self) -> bool {
        self.result.get().is_some()
    }

    /// Parsed matrix. Empty before completion and after a failed parse.
    pub fn data(&self) -> Vec<Vec<f64>> {
        self.result.get().cloned().unwrap_or_default()
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

async fn read_and_parse(path: &std::path::Path) -> Result<Vec<Vec<f64>>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading result file {}", path.display()))?;
    parse_matrix(&text)
}

/// Parse whitespace-separated rows of floats into a rectangular matrix.
fn parse_matrix(text: &str) -> Result<Vec<Vec<f64>>> {
    let mut matrix: Vec<Vec<f64>> = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>()
                    .with_context(|| format!("bad number '{tok}' on line {}", lineno + 1))
            })
            .collect::<Result<Vec<f64>>>()?;
        if let Some(first) = matrix.first() {
            if row.len() != first.len() {
                return Err(anyhow!(
                    "ragged matrix: line {} has {} columns, expected {}",
                    lineno + 1,
                    row.len(),
                    first.len()
                ));
            }
        }
        matrix.push(row);
    }
    Ok(matrix)
}
