//! Data types for the form automaton.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One field to fill: where it lives and what to put there. The kind is
/// discovered at fill time, not supplied here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldSpec {
    pub selector: String,
    pub value: Value,
}

impl FieldSpec {
    pub fn new(selector: impl Into<String>, value: Value) -> Self {
        Self {
            selector: selector.into(),
            value,
        }
    }

    pub fn text(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(selector, Value::String(value.into()))
    }
}

/// Closed classification of a live element, decided once per field.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Select,
    Checkbox,
    Radio,
    File,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormOptions {
    /// Budget for locating the form, for post-submit navigation, and for
    /// dynamic-field waits.
    pub timeout: Duration,

    /// Attempt native submission once every field and validation is clean.
    pub submit: bool,

    /// Expression evaluated in the document context, expected to return
    /// `{valid, errors}`.
    pub validator: Option<String>,

    /// Base inter-keystroke delay for text fields.
    pub per_key_delay: Duration,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5000),
            submit: false,
            validator: None,
            per_key_delay: Duration::from_millis(30),
        }
    }
}

/// Result of one fill run. `success` is strictly "no errors accumulated".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormReport {
    pub success: bool,
    pub errors: Vec<String>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,

    pub latency_ms: u64,
}

impl FormReport {
    pub(crate) fn finish(started_at: DateTime<Utc>, start: Instant, errors: Vec<String>) -> Self {
        Self {
            success: errors.is_empty(),
            errors,
            started_at,
            latency_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Verdict from a caller validator or from harvesting native constraint
/// validation messages.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}
