//! Outcome types for stabilization runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of two independent proxies for "content changed", captured
/// before and after each growth attempt and compared by value equality.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GrowthSignal {
    pub height: i64,
    pub node_count: i64,
}

/// Why a run ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SettleReason {
    /// The productive-step ceiling was reached.
    MaxIterations,

    /// The stagnation ceiling was reached on clean no-change comparisons.
    MaxRetries,

    /// The termination selector appeared.
    SelectorMatched,

    /// The termination predicate evaluated truthy.
    PredicateMatched,

    /// The stagnation ceiling was reached and the terminal step was itself
    /// caused by a caught exception.
    Error,
}

/// Immutable result of one driver run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettleOutcome {
    /// Productive growth steps registered. Never exceeds the configured
    /// ceiling.
    pub iterations: u32,

    /// Length of the stagnation streak at termination; zero whenever the
    /// last step registered growth.
    pub retries: u32,

    pub reason: SettleReason,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,

    pub latency_ms: u64,
}
