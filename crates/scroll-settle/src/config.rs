//! Configuration for the stabilization driver.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed configuration. The one hard failure the driver signals; every
/// runtime problem degrades into the returned outcome instead.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ConfigError {
    #[error("max_iterations must be greater than zero")]
    ZeroIterations,

    #[error("max_stagnations must be greater than zero")]
    ZeroStagnations,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettleConfig {
    /// Hard ceiling on productive growth steps.
    pub max_iterations: u32,

    /// Time allowed for asynchronous rendering after a growth trigger.
    pub inter_step_delay: Duration,

    /// Consecutive no-change steps tolerated before giving up.
    pub max_stagnations: u32,

    /// Selector whose presence ends the run early.
    pub termination_selector: Option<String>,

    /// Zero-argument expression evaluated in the document; truthy ends the
    /// run early. Checked after the selector.
    pub termination_predicate: Option<String>,

    /// Load-more affordance to click, when present, on each growth step.
    pub load_more_selector: Option<String>,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            inter_step_delay: Duration::from_millis(1000),
            max_stagnations: 5,
            termination_selector: None,
            termination_predicate: None,
            load_more_selector: None,
        }
    }
}

impl SettleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.max_stagnations == 0 {
            return Err(ConfigError::ZeroStagnations);
        }
        Ok(())
    }

    /// Extra wait after a stagnant step, absorbing late-arriving content.
    pub(crate) fn backoff_delay(&self) -> Duration {
        self.inter_step_delay.saturating_mul(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SettleConfig::default();
        assert_eq!(config.max_iterations, 20);
        assert_eq!(config.inter_step_delay, Duration::from_millis(1000));
        assert_eq!(config.max_stagnations, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_ceilings_are_rejected() {
        let mut config = SettleConfig::default();
        config.max_iterations = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroIterations));

        let mut config = SettleConfig::default();
        config.max_stagnations = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroStagnations));
    }

    #[test]
    fn backoff_doubles_the_step_delay() {
        let config = SettleConfig {
            inter_step_delay: Duration::from_millis(250),
            ..SettleConfig::default()
        };
        assert_eq!(config.backoff_delay(), Duration::from_millis(500));
    }
}
