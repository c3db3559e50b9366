//! Error taxonomy shared by every component.

use thiserror::Error;

/// Recoverable failures surfaced by the driver ports.
///
/// Nothing here is fatal to the caller: components absorb these and reflect
/// them in their returned outcome or report instead of propagating.
#[derive(Debug, Error, Clone)]
pub enum SurfaceError {
    /// Selector or element could not be resolved.
    #[error("Selector not found: {0}")]
    NotFound(String),

    /// A bounded wait (selector, navigation, event) exceeded its budget.
    #[error("Timed out waiting for {0}")]
    Timeout(String),

    /// Code evaluated in the document context threw.
    #[error("Evaluation failed: {0}")]
    Eval(String),

    /// Driver transport or protocol failure.
    #[error("Driver I/O error: {0}")]
    Io(String),
}

impl SurfaceError {
    /// Whether retrying the same operation can plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SurfaceError::Timeout(_) | SurfaceError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(SurfaceError::Timeout("nav".into()).is_retryable());
        assert!(SurfaceError::Io("socket".into()).is_retryable());
        assert!(!SurfaceError::NotFound("#missing".into()).is_retryable());
        assert!(!SurfaceError::Eval("boom".into()).is_retryable());
    }
}
