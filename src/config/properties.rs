// src/config/properties.rs

//! Flat `key=value` record files.
//!
//! The minimal dialect the executor's configuration files use: one record
//! per line, first `=` splits key from value, `#` and `!` start comment
//! lines, blank lines ignored. Values are stored verbatim (they contain
//! paths and comma-separated lists).

use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::Result;

/// Parse record text into a key→value map.
pub fn parse(text: &str) -> BTreeMap<String, String> {
    let mut records = BTreeMap::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }
        if let Some((key, value)) = trimmed.split_once('=') {
            records.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    records
}

/// Read a record file into a key→value map.
pub fn read(path: impl AsRef<Path>) -> Result<BTreeMap<String, String>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    Ok(parse(&text))
}

/// Write records sorted by key, one `key=value` line each.
pub fn write(path: impl AsRef<Path>, records: &BTreeMap<String, String>) -> Result<()> {
    let mut out = String::new();
    for (key, value) in records {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    std::fs::write(path.as_ref(), out)?;
    Ok(())
}
