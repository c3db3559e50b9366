//! Shared primitives for the PageKit interaction core.
//!
//! Holds the identifiers, element handles, and error taxonomy common to all
//! components, plus the port traits the components consume. The actual
//! browser driver lives outside this workspace; callers implement the ports
//! on top of whatever driver they own.

pub mod errors;
pub mod ports;
pub mod redact;
pub mod value;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use errors::SurfaceError;
pub use ports::{DomPort, FormPort, ResponseEvent, ResponseFeed};
pub use value::js_truthy;

/// Correlation id for a single component invocation, carried in tracing spans.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Driver-issued identifier for an observed network request.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

/// Opaque handle to a live element, paired with the selector that resolved
/// it so error messages stay meaningful after the handle goes stale.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ElementHandle {
    pub token: String,
    pub selector: String,
}

impl ElementHandle {
    pub fn new(token: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            selector: selector.into(),
        }
    }
}

/// Probe result describing a live element. The automaton classifies fields
/// from these facts at fill time; markup is not under the caller's control.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ElementFacts {
    pub tag: String,
    pub input_type: Option<String>,
}

impl ElementFacts {
    pub fn new(tag: impl Into<String>, input_type: Option<&str>) -> Self {
        Self {
            tag: tag.into(),
            input_type: input_type.map(|t| t.to_string()),
        }
    }
}
