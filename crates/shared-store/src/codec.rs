//! # Value Codec
//!
//! Maps JSON values to the string form the store carries on the wire and back.
//!
//! - Plain strings are written as-is (no added quoting).
//! - Everything else is written as canonical JSON text.
//! - Decoding is permissive: text that is not valid JSON comes back as
//!   [`Decoded::Raw`] so legacy plain-string values stay readable.
//!
//! A string whose text happens to be valid JSON (e.g. `"123"`) decodes to the
//! parsed value, not back to the string. Callers that must tell the two apart
//! can match on [`Decoded`] before collapsing it.

use serde_json::Value;

/// Result of decoding a stored string.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The text was valid JSON.
    Parsed(Value),
    /// The text was not valid JSON and is returned unchanged.
    Raw(String),
}

impl Decoded {
    /// Collapse into a single JSON value. `Raw` text becomes a JSON string.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Decoded::Parsed(value) => value,
            Decoded::Raw(text) => Value::String(text),
        }
    }

    /// Borrow the parsed value, if any.
    #[must_use]
    pub fn as_parsed(&self) -> Option<&Value> {
        match self {
            Decoded::Parsed(value) => Some(value),
            Decoded::Raw(_) => None,
        }
    }

    #[must_use]
    pub fn is_raw(&self) -> bool {
        matches!(self, Decoded::Raw(_))
    }

    /// True for `Raw("")`, which is what a missing or deleted entry decodes to.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Decoded::Raw(text) if text.is_empty())
    }
}

/// Encode a value for transport.
#[must_use]
pub fn encode(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Decode transport text, falling back to the raw text on parse failure.
#[must_use]
pub fn decode(text: &str) -> Decoded {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Decoded::Parsed(value),
        Err(_) => Decoded::Raw(text.to_string()),
    }
}
