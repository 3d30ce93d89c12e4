//! The run contract shared by every backend adapter.
//!
//! A [`Run`] is one backend under test. All adapters expose the same menu
//! of execution strategies; the batch disciplines themselves live in
//! [`dispatch`] so their timing, ordering, and error semantics are
//! identical across backends.

mod dispatch;


pub use dispatch::resolve_batch;

use std::sync::Arc;

use async_trait::async_trait;
use clap::ValueEnum;
use tokio::sync::Semaphore;

use crate::error::{Capability, ConfigError, RunError, RunResult};
use crate::sched::Scheduling;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Backend {
    Reqwest,
    Wreq,
    Hyper,
}

impl Backend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Backend::Reqwest => "reqwest",
            Backend::Wreq => "wreq",
            Backend::Hyper => "hyper",
        }
    }

    /// Uppercase form used in timer labels.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Backend::Reqwest => "REQWEST",
            Backend::Wreq => "WREQ",
            Backend::Hyper => "HYPER",
        }
    }
}

/// Policy for resolving a batch of concurrently issued requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Discipline {
    /// Results collected in the order individual requests finish.
    AsCompleted,
    /// Results in issue order; the first failure abandons the wait.
    Gather,
    /// Structured: siblings are cancelled on first failure and member
    /// failures surface as one aggregated error.
    TaskGroup,
}

impl Discipline {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Discipline::AsCompleted => "as-completed",
            Discipline::Gather => "gather",
            Discipline::TaskGroup => "task-group",
        }
    }

    /// Uppercase form used in timer labels.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Discipline::AsCompleted => "AS COMPLETED",
            Discipline::Gather => "GATHER",
            Discipline::TaskGroup => "TASK GROUP",
        }
    }
}

impl std::str::FromStr for Discipline {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "as-completed" => Ok(Discipline::AsCompleted),
            "gather" => Ok(Discipline::Gather),
            "task-group" => Ok(Discipline::TaskGroup),
            _ => Err(ConfigError::UnknownDiscipline {
                value: s.to_owned(),
            }),
        }
    }
}

/// Authentication menu reserved for the unimplemented auth hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    Basic { username: String, password: String },
    Token { token: String },
    OAuth {
        client_id: String,
        client_secret: String,
    },
}

/// External rate-limit description for a run. Descriptive only; nothing
/// enforces these yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunLimits {
    /// Requests permitted per period, per the target service's rate limit.
    pub volume_limit: Option<u64>,
    /// Period in seconds within which `volume_limit` requests are allowed.
    pub period_limit: Option<u64>,
    /// Maximum requests intended to be in flight at once.
    pub concurrency_limit: Option<usize>,
}

/// Backend-independent state every adapter embeds.
#[derive(Debug)]
pub struct RunCore {
    limits: RunLimits,
    admission: Option<Arc<Semaphore>>,
}

impl RunCore {
    #[must_use]
    pub fn new(limits: RunLimits) -> Self {
        let admission = limits
            .concurrency_limit
            .map(|cap| Arc::new(Semaphore::new(cap)));
        RunCore { limits, admission }
    }

    #[must_use]
    pub const fn limits(&self) -> &RunLimits {
        &self.limits
    }

    /// Admission-control extension point. Constructed from
    /// `concurrency_limit` but not consulted by any dispatch path.
    #[must_use]
    pub const fn admission(&self) -> Option<&Arc<Semaphore>> {
        self.admission.as_ref()
    }

    /// # Errors
    ///
    /// Always fails with [`RunError::Unsupported`]; authentication is a
    /// reserved extension seam.
    pub fn configure_auth(&mut self, _method: &AuthMethod) -> RunResult<()> {
        Err(RunError::Unsupported {
            capability: Capability::Authentication,
        })
    }

    /// # Errors
    ///
    /// Always fails with [`RunError::Unsupported`]; rate-limit enforcement
    /// is a reserved extension seam.
    pub fn enforce_rate_limit(&self) -> RunResult<()> {
        Err(RunError::Unsupported {
            capability: Capability::RateLimitEnforcement,
        })
    }
}

/// One backend under test.
///
/// For successful batch operations the number of results always equals the
/// number of input URLs, whatever the discipline and scheduling mode.
#[async_trait]
pub trait Run: Send + Sync {
    fn backend(&self) -> Backend;

    fn core(&self) -> &RunCore;

    fn core_mut(&mut self) -> &mut RunCore;

    /// Issues one blocking GET and returns the response body.
    ///
    /// # Errors
    ///
    /// Surfaces the client's transport failure unchanged.
    fn single_sync(&self, url: &str) -> RunResult<String>;

    /// Issues the requests sequentially over one reused client, preserving
    /// input order in the output.
    ///
    /// # Errors
    ///
    /// Surfaces the first transport failure unchanged.
    fn batch_sync(&self, urls: &[String]) -> RunResult<Vec<String>>;

    /// Issues all requests as concurrent units of work against one shared
    /// client, resolved under the given discipline and scheduling mode.
    ///
    /// # Errors
    ///
    /// Per discipline: `as-completed` and `gather` surface the first member
    /// failure; `task-group` surfaces [`RunError::Aggregate`].
    async fn batch_async(
        &self,
        urls: &[String],
        discipline: Discipline,
        scheduling: Scheduling,
    ) -> RunResult<Vec<String>>;

    /// # Errors
    ///
    /// Always fails with [`RunError::Unsupported`].
    fn configure_auth(&mut self, method: &AuthMethod) -> RunResult<()> {
        self.core_mut().configure_auth(method)
    }

    /// # Errors
    ///
    /// Always fails with [`RunError::Unsupported`].
    fn enforce_rate_limit(&self) -> RunResult<()> {
        self.core().enforce_rate_limit()
    }
}
