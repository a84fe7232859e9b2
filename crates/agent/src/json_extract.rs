//! Best-effort extraction of a JSON object from free-text oracle output.
//!
//! Oracle replies are untrusted text. Extraction runs in two stages:
//!
//! 1. Parse the whole (trimmed) reply as the expected shape.
//! 2. Otherwise find the first balanced `{...}` substring, allowing one
//!    level of nested braces, and parse that.
//!
//! Callers decide what default to use when both stages fail.

use serde::de::DeserializeOwned;
use syra_core::error::ParseError;

/// Maximum brace depth accepted by the scan stage (outer object + one nested).
const MAX_DEPTH: usize = 2;

pub fn extract_object<T: DeserializeOwned>(reply: &str) -> Result<T, ParseError> {
    if let Ok(value) = serde_json::from_str::<T>(reply.trim()) {
        return Ok(value);
    }

    let candidate = find_balanced_object(reply).ok_or(ParseError::NoJsonFound)?;
    serde_json::from_str::<T>(candidate).map_err(|e| ParseError::InvalidJson(e.to_string()))
}

/// The first brace-delimited substring whose nesting stays within [`MAX_DEPTH`].
///
/// Braces inside string literals are not special-cased.
pub fn find_balanced_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();

    'starts: for start in text.match_indices('{').map(|(i, _)| i) {
        let mut depth = 0usize;
        for (offset, &b) in bytes[start..].iter().enumerate() {
            match b {
                b'{' => {
                    depth += 1;
                    if depth > MAX_DEPTH {
                        continue 'starts;
                    }
                }
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&text[start..=start + offset]);
                    }
                }
                _ => {}
            }
        }
    }
    None
}
