//! Session facade over one live document context.

use std::sync::Arc;
use std::time::Duration;

use form_flow::{FieldSpec, FormOptions, FormReport, FormRunner, ValidationReport};
use page_surface::{DomPort, ElementHandle, FormPort, ResponseFeed};
use response_tap::{await_response, ResponseMatch, UrlMatcher};
use scroll_settle::{ConfigError, SettleConfig, SettleDriver, SettleOutcome};

/// One page session and the components that operate on it.
///
/// The driver is shared behind an `Arc`, so independent operations can be
/// in flight concurrently — say, a settle run racing a response wait for
/// the XHR its load-more click fires — without contending: correlator
/// registration is per-call and the settle loop owns its own counters.
pub struct PageSession<D> {
    driver: Arc<D>,
}

impl<D> PageSession<D>
where
    D: DomPort + FormPort + ResponseFeed,
{
    pub fn new(driver: Arc<D>) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> Arc<D> {
        self.driver.clone()
    }

    /// Grow the page until it stabilizes. Malformed configuration is the
    /// only hard failure; every runtime problem lands in the outcome.
    pub async fn settle(&self, config: SettleConfig) -> Result<SettleOutcome, ConfigError> {
        let driver = SettleDriver::new(config)?;
        Ok(driver.run(self.driver.as_ref()).await)
    }

    /// Resolve the first response matching `matcher`, or time out.
    pub async fn await_response(&self, matcher: &UrlMatcher, timeout: Duration) -> ResponseMatch {
        await_response(self.driver.as_ref(), matcher, timeout).await
    }

    /// Fill and optionally submit a form.
    pub async fn fill_form(
        &self,
        form_selector: &str,
        fields: &[FieldSpec],
        options: FormOptions,
    ) -> FormReport {
        FormRunner::new(options)
            .fill(self.driver.as_ref(), form_selector, fields)
            .await
    }

    /// Click a trigger and collect the fields it reveals; empty on timeout.
    pub async fn reveal_fields(
        &self,
        trigger_selector: &str,
        expect_selector: &str,
        timeout: Duration,
    ) -> Vec<ElementHandle> {
        let options = FormOptions {
            timeout,
            ..FormOptions::default()
        };
        FormRunner::new(options)
            .reveal_fields(self.driver.as_ref(), trigger_selector, expect_selector)
            .await
    }

    /// Force native constraint validation and harvest rendered messages.
    pub async fn validation_messages(
        &self,
        form_selector: &str,
        error_selector: &str,
    ) -> ValidationReport {
        FormRunner::new(FormOptions::default())
            .validation_messages(self.driver.as_ref(), form_selector, error_selector)
            .await
    }
}

impl<D> Clone for PageSession<D> {
    fn clone(&self) -> Self {
        Self {
            driver: self.driver.clone(),
        }
    }
}
