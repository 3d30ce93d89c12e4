//! Experiment matrix construction and execution.
//!
//! A plan is the cross product of the selected backends with the selected
//! strategies: the synchronous pair (single, batch) plus every active
//! {scheduling mode} x {completion discipline} cell for the asynchronous
//! batch. Each asynchronous invocation runs under a fresh current-thread
//! runtime, so every matrix cell gets its own event loop.

use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::args::CliArgs;
use crate::backends::make_run;
use crate::config::ConfigFile;
use crate::error::{AppError, AppResult, ConfigError, RunResult};
use crate::run::{Backend, Discipline, RunLimits};
use crate::sched::Scheduling;
use crate::timing::{time_blocking, time_suspending};

const DEFAULT_URL: &str = "https://fakerapi.it/api/v1/books?_quantity=1";
const DEFAULT_REQUESTS: usize = 1000;

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ExperimentPlan {
    pub(crate) backends: Vec<Backend>,
    pub(crate) run_sync: bool,
    pub(crate) run_async: bool,
    pub(crate) schedulings: Vec<Scheduling>,
    pub(crate) disciplines: Vec<Discipline>,
    pub(crate) url: String,
    pub(crate) requests: usize,
    pub(crate) cooldown: Duration,
    pub(crate) limits: RunLimits,
}

pub(crate) fn build_plan(args: &CliArgs, config: Option<&ConfigFile>) -> AppResult<ExperimentPlan> {
    let backends = if args.backends.is_empty() {
        configured_backends(config)
    } else {
        let mut backends = Vec::new();
        for backend in &args.backends {
            if !backends.contains(backend) {
                backends.push(*backend);
            }
        }
        backends
    };

    let synchronicity = config.and_then(|config| config.synchronicity.as_ref());
    let run_sync = synchronicity
        .and_then(|synchronicity| synchronicity.run_sync)
        .unwrap_or(true);
    let run_async = synchronicity
        .and_then(|synchronicity| synchronicity.run_async)
        .unwrap_or(true);

    let asynchronous = config.and_then(|config| config.asynchronous.as_ref());
    let schedulings = match asynchronous.and_then(|asynchronous| asynchronous.scheduling.as_ref()) {
        Some(table) => activated(table),
        None => vec![Scheduling::Lazy, Scheduling::Eager],
    };
    let disciplines = match asynchronous.and_then(|asynchronous| asynchronous.discipline.as_ref()) {
        Some(table) => activated(table),
        None => vec![
            Discipline::AsCompleted,
            Discipline::Gather,
            Discipline::TaskGroup,
        ],
    };

    let experiment = config.and_then(|config| config.experiment.as_ref());
    let url = args
        .url
        .clone()
        .or_else(|| experiment.and_then(|experiment| experiment.url.clone()))
        .unwrap_or_else(|| DEFAULT_URL.to_owned());
    url::Url::parse(&url).map_err(|err| {
        AppError::config(ConfigError::InvalidUrl {
            url: url.clone(),
            source: err,
        })
    })?;
    let requests = args
        .requests
        .or_else(|| experiment.and_then(|experiment| experiment.requests))
        .unwrap_or(DEFAULT_REQUESTS);
    let cooldown_secs = args
        .cooldown
        .or_else(|| experiment.and_then(|experiment| experiment.cooldown_secs))
        .unwrap_or(0);

    let limits_config = config.and_then(|config| config.limits.as_ref());
    let limits = RunLimits {
        volume_limit: limits_config.and_then(|limits| limits.volume),
        period_limit: limits_config.and_then(|limits| limits.period_secs),
        concurrency_limit: limits_config.and_then(|limits| limits.concurrency),
    };

    Ok(ExperimentPlan {
        backends,
        run_sync,
        run_async,
        schedulings,
        disciplines,
        url,
        requests,
        cooldown: Duration::from_secs(cooldown_secs),
        limits,
    })
}

fn configured_backends(config: Option<&ConfigFile>) -> Vec<Backend> {
    let table = config.and_then(|config| config.backend.as_ref());
    let mut backends = Vec::new();
    if table.and_then(|table| table.reqwest).unwrap_or(true) {
        backends.push(Backend::Reqwest);
    }
    if table.and_then(|table| table.wreq).unwrap_or(true) {
        backends.push(Backend::Wreq);
    }
    if table.and_then(|table| table.hyper).unwrap_or(true) {
        backends.push(Backend::Hyper);
    }
    backends
}

/// Collects the activated entries of a name-to-flag table, skipping names
/// that do not parse.
fn activated<T>(table: &BTreeMap<String, bool>) -> Vec<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let mut selected = Vec::new();
    for (name, enabled) in table {
        if !enabled {
            continue;
        }
        match name.parse::<T>() {
            Ok(value) => selected.push(value),
            Err(err) => warn!(%err, "ignoring unknown table entry"),
        }
    }
    selected
}

pub(crate) fn execute_plan(plan: &ExperimentPlan) -> AppResult<()> {
    let urls = vec![plan.url.clone(); plan.requests];
    let mut cooldown = Cooldown::new(plan.cooldown);

    for backend in &plan.backends {
        let run = make_run(*backend, plan.limits);
        info!(backend = backend.as_str(), "starting runs");

        if plan.run_sync {
            cooldown.pause();
            let label = format!("{}-SINGLE-SYNC", backend.label());
            let outcome = time_blocking(Some(label.as_str()), || run.single_sync(&plan.url));
            log_outcome(&label, &outcome);

            cooldown.pause();
            let label = format!("{}-MANY-SYNC", backend.label());
            let outcome = time_blocking(Some(label.as_str()), || run.batch_sync(&urls));
            log_outcome(&label, &outcome);
        }

        if plan.run_async {
            for scheduling in &plan.schedulings {
                info!(
                    backend = backend.as_str(),
                    mode = scheduling.as_str(),
                    "scheduling mode block"
                );
                for discipline in &plan.disciplines {
                    cooldown.pause();
                    let label = format!(
                        "{}-MANY-ASYNC - {}",
                        backend.label(),
                        discipline.label()
                    );
                    let runtime = tokio::runtime::Builder::new_current_thread()
                        .enable_all()
                        .build()?;
                    let outcome = runtime.block_on(time_suspending(
                        Some(label.as_str()),
                        run.batch_async(&urls, *discipline, *scheduling),
                    ));
                    log_outcome(&label, &outcome);
                }
            }
        }
    }

    Ok(())
}

fn log_outcome<T>(label: &str, outcome: &RunResult<T>) {
    match outcome {
        Ok(_) => debug!(label, "invocation completed"),
        Err(err) => error!(label, %err, "invocation failed; continuing with next entry"),
    }
}

/// Pause applied between timed invocations, skipped before the first one.
struct Cooldown {
    delay: Duration,
    pending: bool,
}

impl Cooldown {
    const fn new(delay: Duration) -> Self {
        Cooldown {
            delay,
            pending: false,
        }
    }

    fn pause(&mut self) {
        if self.pending && !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.pending = true;
    }
}
