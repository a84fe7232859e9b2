//! Normalization of raw capability results into display text.
//!
//! Capabilities return whatever shape is natural for them: a scalar, a
//! record, or a list. Before synthesis every result goes through one rule:
//!
//! 1. Records and records inside lists lose their deny-listed fields.
//! 2. A list of items carrying a `text` field collapses to those strings.
//! 3. Everything else is stringified canonically.
//!
//! A string normalizes to itself, so normalizing twice is a no-op.

use serde_json::{Map, Value};

/// Field that carries an item's display text.
pub const DISPLAY_FIELD: &str = "text";

/// Fields stripped from structured results unless configured otherwise.
pub const DEFAULT_DENY_LIST: &[&str] = &["signature", "extras"];

#[derive(Debug, Clone)]
pub struct ResultNormalizer {
    deny_list: Vec<String>,
}

impl Default for ResultNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_DENY_LIST.iter().map(|s| s.to_string()))
    }
}

impl ResultNormalizer {
    pub fn new(deny_list: impl IntoIterator<Item = String>) -> Self {
        Self {
            deny_list: deny_list.into_iter().collect(),
        }
    }

    /// Remove deny-listed fields from a record, or from each record in a list.
    pub fn strip(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.strip_map(map)),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| match item {
                        Value::Object(map) => Value::Object(self.strip_map(map)),
                        other => other.clone(),
                    })
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    fn strip_map(&self, map: &Map<String, Value>) -> Map<String, Value> {
        map.iter()
            .filter(|(k, _)| !self.deny_list.iter().any(|d| d == *k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Produce the display text for a raw result.
    pub fn normalize(&self, value: &Value) -> String {
        match self.strip(value) {
            Value::String(s) => s,
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => render_number(&n),
            Value::Object(map) => record_text(&map)
                .unwrap_or_else(|| Value::Object(map).to_string()),
            Value::Array(items) => {
                let texts: Vec<&str> = items.iter().filter_map(item_text).collect();
                if texts.is_empty() {
                    Value::Array(items.clone()).to_string()
                } else {
                    texts.join(" ")
                }
            }
        }
    }
}

/// The display text of a record: its `text` field, else its first string
/// field in the order the record was built.
fn record_text(map: &Map<String, Value>) -> Option<String> {
    if let Some(Value::String(text)) = map.get(DISPLAY_FIELD) {
        return Some(text.clone());
    }
    map.values().find_map(|v| v.as_str().map(String::from))
}

fn item_text(item: &Value) -> Option<&str> {
    match item {
        Value::String(s) => Some(s),
        Value::Object(map) => map.get(DISPLAY_FIELD).and_then(Value::as_str),
        _ => None,
    }
}

/// Integers and integral floats render without a fractional part.
pub fn render_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
