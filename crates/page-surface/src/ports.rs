//! Port traits the interaction components consume.
//!
//! Each component depends only on the slice of driver capability it needs,
//! so every component stays testable against a hand-rolled mock.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::errors::SurfaceError;
use crate::{ElementFacts, ElementHandle, RequestId};

/// Document-level capability needed by the stabilization driver.
#[async_trait]
pub trait DomPort: Send + Sync {
    /// Evaluate an expression in the document context, returning its
    /// JSON-serializable result.
    async fn eval(&self, expression: &str) -> Result<Value, SurfaceError>;

    /// Whether at least one element currently matches the selector.
    async fn exists(&self, selector: &str) -> Result<bool, SurfaceError>;

    /// Click the first element matching the selector.
    async fn click_selector(&self, selector: &str) -> Result<(), SurfaceError>;

    /// Suspend for the given duration.
    async fn pause(&self, duration: Duration);
}

/// Element-level capability needed by the form automaton.
#[async_trait]
pub trait FormPort: Send + Sync {
    /// Wait up to `timeout` for a selector to appear.
    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<ElementHandle, SurfaceError>;

    /// Resolve the first matching element, if any.
    async fn query_one(&self, selector: &str) -> Result<Option<ElementHandle>, SurfaceError>;

    /// Resolve all matching elements.
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, SurfaceError>;

    /// Probe a live element for its tag and input type.
    async fn facts(&self, handle: &ElementHandle) -> Result<ElementFacts, SurfaceError>;

    async fn click(&self, handle: &ElementHandle) -> Result<(), SurfaceError>;

    /// Type text character by character with the given inter-keystroke delay.
    async fn type_text(
        &self,
        handle: &ElementHandle,
        text: &str,
        per_key_delay: Duration,
    ) -> Result<(), SurfaceError>;

    /// Choose a `<select>` option by its value attribute.
    async fn select_value(&self, handle: &ElementHandle, value: &str) -> Result<(), SurfaceError>;

    /// Supply a file path to a file input.
    async fn attach_file(&self, handle: &ElementHandle, path: &Path) -> Result<(), SurfaceError>;

    async fn eval(&self, expression: &str) -> Result<Value, SurfaceError>;

    /// Wait up to `timeout` for a navigation or equivalent state transition.
    async fn wait_for_navigation(&self, timeout: Duration) -> Result<(), SurfaceError>;

    async fn pause(&self, duration: Duration);
}

/// A response observed on the page session's network.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResponseEvent {
    pub request_id: RequestId,
    pub url: String,
    pub status: u16,
}

/// Stream of response events plus body retrieval.
///
/// Subscription is per-call: each subscriber owns its receiver, and dropping
/// the receiver is the deregistration. Concurrent correlator invocations
/// therefore never consume each other's events.
#[async_trait]
pub trait ResponseFeed: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<ResponseEvent>;

    /// Read the body of a previously observed response. Fails when the
    /// stream was already consumed or the request is gone.
    async fn body_text(&self, request: &RequestId) -> Result<String, SurfaceError>;
}
