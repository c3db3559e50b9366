//! Single-shot network response correlator.
//!
//! `await_response` resolves the first observed response whose URL
//! satisfies a matcher, or times out. Each invocation owns its own
//! subscription and timer; exactly one of the two settles the call, and
//! both are torn down synchronously before the result is returned, so
//! repeated invocations within one session never accumulate dangling
//! listeners and concurrent invocations never consume each other's events.

mod matcher;

pub use matcher::{MatcherError, UrlMatcher};

use std::time::Duration;

use page_surface::{redact, ResponseFeed};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

/// Default budget for one correlation.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Terminal value of one correlation; produced exactly once per call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResponseMatch {
    pub matched: bool,
    pub body: Option<String>,
}

impl ResponseMatch {
    fn hit(body: Option<String>) -> Self {
        Self {
            matched: true,
            body,
        }
    }

    fn miss() -> Self {
        Self {
            matched: false,
            body: None,
        }
    }
}

/// Wait for the first response matching `matcher`, up to `timeout`.
///
/// A matched response whose body cannot be read still reports
/// `matched: true` with an empty body; the URL did match.
pub async fn await_response(
    feed: &dyn ResponseFeed,
    matcher: &UrlMatcher,
    timeout: Duration,
) -> ResponseMatch {
    let mut events = feed.subscribe();
    let timer = tokio::time::sleep(timeout);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            _ = &mut timer => {
                debug!(timeout_ms = timeout.as_millis() as u64, "response wait timed out");
                return ResponseMatch::miss();
            }
            event = events.recv() => match event {
                Ok(event) if matcher.matches(&event.url) => {
                    debug!(url = %redact::url(&event.url), status = event.status, "response matched");
                    let body = match feed.body_text(&event.request_id).await {
                        Ok(body) => Some(body),
                        Err(err) => {
                            warn!(url = %redact::url(&event.url), error = %err, "matched response body unreadable");
                            None
                        }
                    };
                    return ResponseMatch::hit(body);
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "response feed lagged; continuing");
                }
                Err(RecvError::Closed) => {
                    // No event can arrive anymore; only the timer may settle
                    // the call.
                    timer.as_mut().await;
                    return ResponseMatch::miss();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use page_surface::{RequestId, ResponseEvent, SurfaceError};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Instant;
    use tokio::sync::broadcast;

    struct TestFeed {
        tx: Mutex<Option<broadcast::Sender<ResponseEvent>>>,
        bodies: Mutex<HashMap<String, Result<String, SurfaceError>>>,
    }

    impl TestFeed {
        fn new() -> Self {
            let (tx, _rx) = broadcast::channel(16);
            Self {
                tx: Mutex::new(Some(tx)),
                bodies: Mutex::new(HashMap::new()),
            }
        }

        fn with_body(self, request: &str, body: Result<String, SurfaceError>) -> Self {
            self.bodies.lock().unwrap().insert(request.into(), body);
            self
        }

        fn emit(&self, request: &str, url: &str) {
            let tx = self.tx.lock().unwrap();
            let _ = tx.as_ref().unwrap().send(ResponseEvent {
                request_id: RequestId(request.into()),
                url: url.into(),
                status: 200,
            });
        }

        fn receiver_count(&self) -> usize {
            self.tx.lock().unwrap().as_ref().unwrap().receiver_count()
        }

        fn close(&self) {
            self.tx.lock().unwrap().take();
        }
    }

    #[async_trait]
    impl ResponseFeed for TestFeed {
        fn subscribe(&self) -> broadcast::Receiver<ResponseEvent> {
            self.tx.lock().unwrap().as_ref().unwrap().subscribe()
        }

        async fn body_text(&self, request: &RequestId) -> Result<String, SurfaceError> {
            self.bodies
                .lock()
                .unwrap()
                .get(&request.0)
                .cloned()
                .unwrap_or_else(|| Err(SurfaceError::Io("body unavailable".into())))
        }
    }

    #[tokio::test]
    async fn matching_event_resolves_with_body() {
        let feed = TestFeed::new().with_body("req-1", Ok("{\"items\":[]}".into()));

        let matcher = UrlMatcher::contains("/api/feed");
        let wait = await_response(
            &feed,
            &matcher,
            Duration::from_millis(500),
        );
        let emit = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            feed.emit("req-0", "https://example.com/static/app.js");
            feed.emit("req-1", "https://example.com/api/feed?page=2");
        };

        let (outcome, _) = tokio::join!(wait, emit);

        assert!(outcome.matched);
        assert_eq!(outcome.body.as_deref(), Some("{\"items\":[]}"));
        assert_eq!(feed.receiver_count(), 0);
    }

    #[tokio::test]
    async fn unreadable_body_still_counts_as_match() {
        let feed = TestFeed::new().with_body(
            "req-1",
            Err(SurfaceError::Io("stream already consumed".into())),
        );

        let matcher = UrlMatcher::contains("/api/feed");
        let wait = await_response(
            &feed,
            &matcher,
            Duration::from_millis(500),
        );
        let emit = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            feed.emit("req-1", "https://example.com/api/feed");
        };

        let (outcome, _) = tokio::join!(wait, emit);

        assert!(outcome.matched);
        assert!(outcome.body.is_none());
    }

    #[tokio::test]
    async fn never_matching_times_out_no_earlier_than_budget() {
        let feed = TestFeed::new();
        let timeout = Duration::from_millis(80);

        let start = Instant::now();
        let never_matcher = UrlMatcher::contains("/never");
        let wait = await_response(&feed, &never_matcher, timeout);
        let emit = async {
            tokio::time::sleep(Duration::from_millis(15)).await;
            feed.emit("req-1", "https://example.com/other");
        };
        let (outcome, _) = tokio::join!(wait, emit);

        assert!(!outcome.matched);
        assert!(outcome.body.is_none());
        assert!(start.elapsed() >= timeout);
        assert_eq!(feed.receiver_count(), 0);
    }

    #[tokio::test]
    async fn second_call_does_not_observe_earlier_events() {
        let feed = TestFeed::new().with_body("req-1", Ok("stale".into()));

        let first = await_response(
            &feed,
            &UrlMatcher::contains("/api"),
            Duration::from_millis(40),
        )
        .await;
        assert!(!first.matched);

        // Emitted with no call in flight; must not leak into the next one.
        feed.emit("req-1", "https://example.com/api/feed");

        let second = await_response(
            &feed,
            &UrlMatcher::contains("/api"),
            Duration::from_millis(40),
        )
        .await;
        assert!(!second.matched);
        assert_eq!(feed.receiver_count(), 0);
    }

    #[tokio::test]
    async fn closed_feed_still_waits_out_the_timer() {
        let feed = TestFeed::new();
        let timeout = Duration::from_millis(80);

        let start = Instant::now();
        let api_matcher = UrlMatcher::contains("/api");
        let wait = await_response(&feed, &api_matcher, timeout);
        let close = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            feed.close();
        };
        let (outcome, _) = tokio::join!(wait, close);

        assert!(!outcome.matched);
        assert!(start.elapsed() >= timeout);
    }
}
