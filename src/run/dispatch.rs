//! Backend-agnostic batch resolution under each completion discipline.

use std::future::Future;

use futures_util::StreamExt;
use futures_util::future::try_join_all;
use futures_util::stream::FuturesUnordered;
use tokio::task::JoinSet;

use super::Discipline;
use crate::error::{RunError, RunResult};
use crate::sched::{Scheduling, Unit};

/// Resolves one batch of requests under the given discipline.
///
/// `fetch` is called once per URL to produce that request's work; the
/// caller closes its shared client into `fetch`, so every unit runs
/// against the same connection pool. Abandoned units are cancelled on
/// drop (lazy units never run, eager tasks are aborted).
///
/// # Errors
///
/// `as-completed` and `gather` surface the first member failure directly;
/// `task-group` cancels the surviving members and surfaces
/// [`RunError::Aggregate`] carrying every observed member failure.
pub async fn resolve_batch<T, F, Fut>(
    urls: &[String],
    discipline: Discipline,
    scheduling: Scheduling,
    fetch: F,
) -> RunResult<Vec<T>>
where
    T: Send + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = RunResult<T>> + Send + 'static,
{
    match discipline {
        Discipline::AsCompleted => as_completed(urls, scheduling, fetch).await,
        Discipline::Gather => gather(urls, scheduling, fetch).await,
        // JoinSet members start at spawn, so this discipline is eager on
        // tokio regardless of the requested mode.
        Discipline::TaskGroup => task_group(urls, fetch).await,
    }
}

async fn as_completed<T, F, Fut>(
    urls: &[String],
    scheduling: Scheduling,
    fetch: F,
) -> RunResult<Vec<T>>
where
    T: Send + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = RunResult<T>> + Send + 'static,
{
    let mut pending: FuturesUnordered<_> = urls
        .iter()
        .map(|url| Unit::new(scheduling, fetch(url.clone())).resolve())
        .collect();

    let mut bodies = Vec::with_capacity(urls.len());
    while let Some(outcome) = pending.next().await {
        bodies.push(outcome?);
    }
    Ok(bodies)
}

async fn gather<T, F, Fut>(urls: &[String], scheduling: Scheduling, fetch: F) -> RunResult<Vec<T>>
where
    T: Send + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = RunResult<T>> + Send + 'static,
{
    try_join_all(
        urls.iter()
            .map(|url| Unit::new(scheduling, fetch(url.clone())).resolve()),
    )
    .await
}

async fn task_group<T, F, Fut>(urls: &[String], fetch: F) -> RunResult<Vec<T>>
where
    T: Send + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = RunResult<T>> + Send + 'static,
{
    let mut group: JoinSet<(usize, RunResult<T>)> = JoinSet::new();
    for (index, url) in urls.iter().enumerate() {
        let work = fetch(url.clone());
        group.spawn(async move { (index, work.await) });
    }

    let mut slots: Vec<Option<T>> = Vec::new();
    slots.resize_with(urls.len(), || None);
    let mut failures: Vec<RunError> = Vec::new();

    while let Some(joined) = group.join_next().await {
        match joined {
            Ok((index, Ok(body))) => {
                if let Some(slot) = slots.get_mut(index) {
                    *slot = Some(body);
                }
            }
            Ok((_, Err(err))) => {
                failures.push(err);
                group.abort_all();
            }
            Err(err) if err.is_cancelled() => {}
            Err(err) => {
                failures.push(RunError::JoinFailed { source: err });
                group.abort_all();
            }
        }
    }

    if !failures.is_empty() {
        return Err(RunError::Aggregate { failures });
    }

    let mut bodies = Vec::with_capacity(slots.len());
    for slot in slots {
        bodies.push(slot.ok_or(RunError::Cancelled)?);
    }
    Ok(bodies)
}
