//! PageKit — interaction core for live, dynamically-rendered pages.
//!
//! Three components over a caller-owned browser driver, each independently
//! testable against a mocked capability surface:
//!
//! - content stabilization (`scroll-settle`): grow the page and decide when
//!   it has finished loading
//! - network response correlation (`response-tap`): resolve one response
//!   among many concurrent ones without leaking listeners
//! - form automation (`form-flow`): fill heterogeneous inputs, accumulate
//!   partial failures, submit only on a clean slate
//!
//! [`session::PageSession`] composes them for callers that own a page
//! session. The driver itself (navigation, CDP/WebDriver plumbing) stays
//! outside; implement the port traits from `page-surface` on top of it.

pub mod session;
pub mod telemetry;

pub use form_flow::{FieldKind, FieldSpec, FormOptions, FormReport, FormRunner, ValidationReport};
pub use page_surface::{
    js_truthy, redact, ActionId, DomPort, ElementFacts, ElementHandle, FormPort, RequestId,
    ResponseEvent, ResponseFeed, SurfaceError,
};
pub use response_tap::{
    await_response, MatcherError, ResponseMatch, UrlMatcher, DEFAULT_RESPONSE_TIMEOUT,
};
pub use scroll_settle::{
    ConfigError, GrowthSignal, SettleConfig, SettleDriver, SettleOutcome, SettleReason,
};
pub use session::PageSession;
