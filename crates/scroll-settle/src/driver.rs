//! The grow/measure loop.

use std::time::Instant;

use chrono::Utc;
use page_surface::value::js_truthy;
use page_surface::{ActionId, DomPort, SurfaceError};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{ConfigError, SettleConfig};
use crate::model::{GrowthSignal, SettleOutcome, SettleReason};

/// Height plus node count in one round trip. Runs against whichever element
/// actually scrolls for the current layout.
const GROWTH_SIGNAL_JS: &str = "(() => {\n    const scroller = document.scrollingElement || document.documentElement || document.body;\n    return {\n        height: Math.floor(scroller ? scroller.scrollHeight : 0),\n        nodes: document.querySelectorAll('*').length,\n    };\n})()";

const SCROLL_BOTTOM_JS: &str = "(() => {\n    const scroller = document.scrollingElement || document.documentElement || document.body;\n    const maxY = Math.max((scroller ? scroller.scrollHeight : 0) - window.innerHeight, 0);\n    window.scrollTo({ left: 0, top: Math.floor(maxY), behavior: 'auto' });\n    return true;\n})()";

/// Drives a page toward a stable state. `run` never fails; every internal
/// problem degrades to a stagnation event or a terminal `Error` reason.
pub struct SettleDriver {
    config: SettleConfig,
}

impl SettleDriver {
    pub fn new(config: SettleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SettleConfig {
        &self.config
    }

    pub async fn run(&self, dom: &dyn DomPort) -> SettleOutcome {
        let run = ActionId::new();
        let started_at = Utc::now();
        let start = Instant::now();

        let mut iterations: u32 = 0;
        let mut stagnations: u32 = 0;

        info!(
            run = %run.0,
            max_iterations = self.config.max_iterations,
            max_stagnations = self.config.max_stagnations,
            "starting content stabilization"
        );

        let reason = loop {
            // Semantic "done" conditions outrank the growth heuristics and
            // are checked before any growth is attempted.
            match self.check_termination(dom).await {
                Ok(Some(reason)) => break reason,
                Ok(None) => {}
                Err(err) => {
                    debug!(run = %run.0, error = %err, "termination check failed; counted as stagnation");
                    stagnations += 1;
                    if stagnations >= self.config.max_stagnations {
                        break SettleReason::Error;
                    }
                    dom.pause(self.config.backoff_delay()).await;
                    continue;
                }
            }

            match self.grow_once(dom).await {
                Ok(true) => {
                    iterations += 1;
                    stagnations = 0;
                    debug!(run = %run.0, iterations, "growth registered");
                    if iterations >= self.config.max_iterations {
                        break SettleReason::MaxIterations;
                    }
                }
                Ok(false) => {
                    stagnations += 1;
                    debug!(run = %run.0, stagnations, "no change on either signal");
                    if stagnations >= self.config.max_stagnations {
                        break SettleReason::MaxRetries;
                    }
                    dom.pause(self.config.backoff_delay()).await;
                }
                Err(err) => {
                    stagnations += 1;
                    debug!(run = %run.0, stagnations, error = %err, "growth step failed; counted as stagnation");
                    if stagnations >= self.config.max_stagnations {
                        break SettleReason::Error;
                    }
                    dom.pause(self.config.backoff_delay()).await;
                }
            }
        };

        let outcome = SettleOutcome {
            iterations,
            retries: stagnations,
            reason,
            started_at,
            latency_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            run = %run.0,
            iterations = outcome.iterations,
            retries = outcome.retries,
            reason = ?outcome.reason,
            latency_ms = outcome.latency_ms,
            "stabilization finished"
        );
        outcome
    }

    /// Selector presence first, then the predicate.
    async fn check_termination(
        &self,
        dom: &dyn DomPort,
    ) -> Result<Option<SettleReason>, SurfaceError> {
        if let Some(selector) = &self.config.termination_selector {
            if dom.exists(selector).await? {
                return Ok(Some(SettleReason::SelectorMatched));
            }
        }
        if let Some(predicate) = &self.config.termination_predicate {
            let verdict = dom.eval(predicate).await?;
            if js_truthy(&verdict) {
                return Ok(Some(SettleReason::PredicateMatched));
            }
        }
        Ok(None)
    }

    /// One measure/grow/measure round trip. True when either signal moved.
    async fn grow_once(&self, dom: &dyn DomPort) -> Result<bool, SurfaceError> {
        let before = self.capture_signal(dom).await?;
        self.trigger_growth(dom).await?;
        dom.pause(self.config.inter_step_delay).await;
        let after = self.capture_signal(dom).await?;
        Ok(after != before)
    }

    async fn capture_signal(&self, dom: &dyn DomPort) -> Result<GrowthSignal, SurfaceError> {
        let value = dom.eval(GROWTH_SIGNAL_JS).await?;
        Ok(GrowthSignal {
            height: value.get("height").and_then(Value::as_i64).unwrap_or(0),
            node_count: value.get("nodes").and_then(Value::as_i64).unwrap_or(0),
        })
    }

    async fn trigger_growth(&self, dom: &dyn DomPort) -> Result<(), SurfaceError> {
        dom.eval(SCROLL_BOTTOM_JS).await?;
        if let Some(selector) = &self.config.load_more_selector {
            if dom.exists(selector).await? {
                debug!(selector = %selector, "clicking load-more affordance");
                dom.click_selector(selector).await?;
                dom.pause(self.config.inter_step_delay).await;
            }
        }
        Ok(())
    }
}
