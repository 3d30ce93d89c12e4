//! Scheduling mode control for concurrent units of work.
//!
//! The mode is an explicit per-call parameter rather than ambient runtime
//! state, so nothing has to be restored after a run. A lazy [`Unit`] holds
//! its future unstarted; an eager one is spawned onto the ambient tokio
//! runtime at creation and makes progress whenever the loop runs, awaited
//! or not. Dropping an unresolved unit cancels it: a lazy future never
//! runs, an eager task is aborted.

use std::future::Future;

use futures_util::future::BoxFuture;
use tokio::task::JoinHandle;

use crate::error::{ConfigError, RunError, RunResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scheduling {
    Lazy,
    Eager,
}

impl Scheduling {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Scheduling::Lazy => "lazy",
            Scheduling::Eager => "eager",
        }
    }
}

impl std::str::FromStr for Scheduling {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "lazy" => Ok(Scheduling::Lazy),
            "eager" => Ok(Scheduling::Eager),
            _ => Err(ConfigError::UnknownScheduling {
                value: s.to_owned(),
            }),
        }
    }
}

/// One concurrent unit of work in a batch.
pub struct Unit<T> {
    kind: UnitKind<T>,
}

enum UnitKind<T> {
    Lazy(BoxFuture<'static, RunResult<T>>),
    Eager(JoinHandle<RunResult<T>>),
    Resolved,
}

impl<T: Send + 'static> Unit<T> {
    /// Creates a unit under the given scheduling mode.
    ///
    /// Eager mode spawns `work` immediately and requires an ambient tokio
    /// runtime; lazy mode performs no work until [`Unit::resolve`].
    #[must_use]
    pub fn new<F>(mode: Scheduling, work: F) -> Self
    where
        F: Future<Output = RunResult<T>> + Send + 'static,
    {
        let kind = match mode {
            Scheduling::Lazy => UnitKind::Lazy(Box::pin(work)),
            Scheduling::Eager => UnitKind::Eager(tokio::spawn(work)),
        };
        Unit { kind }
    }

    /// Awaits the unit's completion.
    ///
    /// # Errors
    ///
    /// Propagates the work's own failure. An eager unit whose task was
    /// aborted yields [`RunError::Cancelled`]; one whose task panicked
    /// yields [`RunError::JoinFailed`].
    pub async fn resolve(mut self) -> RunResult<T> {
        let outcome = match &mut self.kind {
            UnitKind::Lazy(work) => work.as_mut().await,
            UnitKind::Eager(handle) => match handle.await {
                Ok(outcome) => outcome,
                Err(err) if err.is_cancelled() => Err(RunError::Cancelled),
                Err(err) => Err(RunError::JoinFailed { source: err }),
            },
            UnitKind::Resolved => Err(RunError::Cancelled),
        };
        self.kind = UnitKind::Resolved;
        outcome
    }
}

impl<T> Drop for Unit<T> {
    fn drop(&mut self) {
        if let UnitKind::Eager(handle) = &self.kind {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    fn run_async_test<F>(future: F) -> Result<(), String>
    where
        F: Future<Output = Result<(), String>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| format!("Failed to build runtime: {err}"))?;
        runtime.block_on(future)
    }

    fn counted_work(started: Arc<AtomicUsize>) -> impl Future<Output = RunResult<u32>> + Send + 'static {
        async move {
            started.fetch_add(1, Ordering::SeqCst);
            Ok(1)
        }
    }

    #[test]
    fn parses_mode_names() -> Result<(), String> {
        let eager: Scheduling = " Eager ".parse().map_err(|err| format!("{err}"))?;
        if eager != Scheduling::Eager {
            return Err("expected eager".to_owned());
        }
        if "threaded".parse::<Scheduling>().is_ok() {
            return Err("expected unknown mode to fail".to_owned());
        }
        Ok(())
    }

    #[test]
    fn lazy_unit_performs_no_work_until_resolved() -> Result<(), String> {
        run_async_test(async {
            let started = Arc::new(AtomicUsize::new(0));
            let unit = Unit::new(Scheduling::Lazy, counted_work(Arc::clone(&started)));
            tokio::time::sleep(Duration::from_millis(20)).await;
            if started.load(Ordering::SeqCst) != 0 {
                return Err("lazy unit started before resolve".to_owned());
            }
            let value = unit.resolve().await.map_err(|err| format!("{err}"))?;
            if value != 1 || started.load(Ordering::SeqCst) != 1 {
                return Err("lazy unit did not run on resolve".to_owned());
            }
            Ok(())
        })
    }

    #[test]
    fn eager_unit_starts_before_resolve() -> Result<(), String> {
        run_async_test(async {
            let started = Arc::new(AtomicUsize::new(0));
            let unit = Unit::new(Scheduling::Eager, counted_work(Arc::clone(&started)));
            tokio::time::sleep(Duration::from_millis(20)).await;
            if started.load(Ordering::SeqCst) != 1 {
                return Err("eager unit had not started before resolve".to_owned());
            }
            let value = unit.resolve().await.map_err(|err| format!("{err}"))?;
            if value != 1 {
                return Err("eager unit returned wrong value".to_owned());
            }
            Ok(())
        })
    }

    #[test]
    fn dropping_lazy_unit_cancels_work() -> Result<(), String> {
        run_async_test(async {
            let started = Arc::new(AtomicUsize::new(0));
            let unit = Unit::new(Scheduling::Lazy, counted_work(Arc::clone(&started)));
            drop(unit);
            tokio::time::sleep(Duration::from_millis(20)).await;
            if started.load(Ordering::SeqCst) != 0 {
                return Err("dropped lazy unit still ran".to_owned());
            }
            Ok(())
        })
    }

    #[test]
    fn dropping_eager_unit_aborts_task() -> Result<(), String> {
        run_async_test(async {
            let completed = Arc::new(AtomicUsize::new(0));
            let completed_in_task = Arc::clone(&completed);
            let unit: Unit<u32> = Unit::new(Scheduling::Eager, async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                completed_in_task.fetch_add(1, Ordering::SeqCst);
                Ok(2)
            });
            drop(unit);
            tokio::time::sleep(Duration::from_millis(50)).await;
            if completed.load(Ordering::SeqCst) != 0 {
                return Err("dropped eager unit ran to completion".to_owned());
            }
            Ok(())
        })
    }
}
