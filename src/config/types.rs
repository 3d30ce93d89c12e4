use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// On-disk experiment configuration.
///
/// Every section is optional; the plan builder fills in defaults. The
/// scheduling and discipline tables map a mode name to an activation flag,
/// so a config can pin down exactly which matrix cells run.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ConfigFile {
    pub backend: Option<BackendConfig>,
    pub synchronicity: Option<SynchronicityConfig>,
    pub asynchronous: Option<AsynchronousConfig>,
    pub experiment: Option<ExperimentConfig>,
    pub limits: Option<LimitsConfig>,
}

/// Which client backends to exercise.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub reqwest: Option<bool>,
    pub wreq: Option<bool>,
    pub hyper: Option<bool>,
}

/// Which halves of the sync/async split to run.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct SynchronicityConfig {
    pub run_sync: Option<bool>,
    pub run_async: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct AsynchronousConfig {
    /// Scheduling-mode name ("lazy"/"eager") to activation flag.
    pub scheduling: Option<BTreeMap<String, bool>>,
    /// Completion-discipline name to activation flag.
    pub discipline: Option<BTreeMap<String, bool>>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ExperimentConfig {
    /// Endpoint every request in the experiment hits.
    pub url: Option<String>,
    /// Number of requests per batched invocation.
    pub requests: Option<usize>,
    /// Pause between timed invocations, to stay under service rate limits.
    pub cooldown_secs: Option<u64>,
}

/// Rate-limit description handed to each run. Descriptive only.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    pub volume: Option<u64>,
    pub period_secs: Option<u64>,
    pub concurrency: Option<usize>,
}
