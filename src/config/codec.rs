// src/config/codec.rs

//! Encode/decode helpers for list-valued configuration fields.
//!
//! Lists are stored comma-separated without spaces, e.g. `2,3,4` for node
//! lists and `DX,RZ` for DOF lists; whitespace around elements is tolerated
//! on decode.

use std::fmt::Display;
use std::str::FromStr;

/// Encode a list of displayable elements.
pub fn encode_list<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Decode a comma-separated list, failing on the first bad element.
pub fn decode_list<T>(text: &str) -> Result<Vec<T>, String>
where
    T: FromStr,
    T::Err: Display,
{
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed
        .split(',')
        .map(|tok| {
            tok.trim()
                .parse::<T>()
                .map_err(|e| format!("bad list element '{}': {e}", tok.trim()))
        })
        .collect()
}
