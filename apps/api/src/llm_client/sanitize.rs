//! Response sanitizer: pulls a JSON payload out of free-text model output.
//!
//! Models wrap JSON in prose and code fences no matter how firmly the prompt
//! asks them not to. Fences and backticks are stripped first, then the first
//! substring shaped like the expected payload is parsed.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;

static FENCE_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json|JSON)?|`").expect("fence pattern is valid"));

static OBJECT_PAYLOAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("object pattern is valid"));

static ARRAY_PAYLOAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[\s*\{.*\}\s*\]").expect("array pattern is valid"));

/// The structural shape the caller expects the payload to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// A single JSON object: `{...}`.
    Object,
    /// A JSON array of objects: `[{...}, ...]`.
    Array,
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadShape::Object => f.write_str("JSON object"),
            PayloadShape::Array => f.write_str("JSON array of objects"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no {shape} found in response")]
    NoPayload { shape: PayloadShape },

    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Removes code-fence markers (```` ``` ````, ```` ```json ````) and stray backticks.
pub fn strip_fences(text: &str) -> String {
    FENCE_MARKERS.replace_all(text.trim(), "").trim().to_string()
}

/// Strips formatting, locates the first substring of the requested shape and
/// deserializes it.
pub fn extract_payload<T: DeserializeOwned>(raw: &str, shape: PayloadShape) -> Result<T, ParseError> {
    let cleaned = strip_fences(raw);
    let pattern = match shape {
        PayloadShape::Object => &*OBJECT_PAYLOAD,
        PayloadShape::Array => &*ARRAY_PAYLOAD,
    };
    let found = pattern
        .find(&cleaned)
        .ok_or(ParseError::NoPayload { shape })?;
    Ok(serde_json::from_str(found.as_str())?)
}
