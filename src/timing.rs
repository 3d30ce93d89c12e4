//! Wall-clock timing instrumentation for benchmark invocations.
//!
//! Two small adapters share one reporting core: [`time_blocking`] wraps a
//! blocking call, [`time_suspending`] wraps a future. Both delegate fully,
//! propagate the wrapped outcome unchanged, and print one labeled report
//! line on completion. Failures are values here, so a failing operation
//! still reports its elapsed time before the error reaches the caller.

use std::borrow::Cow;
use std::future::Future;
use std::time::{Duration, Instant};

/// Column width the `<label> COMPLETE ` prefix is dash-padded to.
const LABEL_WIDTH: usize = 48;

/// Runs `op` and prints its report line once it returns.
pub fn time_blocking<T, F>(label: Option<&str>, op: F) -> T
where
    F: FnOnce() -> T,
{
    let label = resolve_label::<F>(label);
    let start = Instant::now();
    let outcome = op();
    report(&label, start.elapsed());
    outcome
}

/// Awaits `work` and prints its report line once it completes.
///
/// The returned future suspends exactly where `work` suspends; wrapping
/// adds no blocking.
pub async fn time_suspending<F>(label: Option<&str>, work: F) -> F::Output
where
    F: Future,
{
    let label = resolve_label::<F>(label);
    let start = Instant::now();
    let outcome = work.await;
    report(&label, start.elapsed());
    outcome
}

fn resolve_label<F>(label: Option<&str>) -> Cow<'_, str> {
    match label {
        Some(label) => Cow::Borrowed(label),
        None => Cow::Owned(format!("{} EXECUTION", std::any::type_name::<F>())),
    }
}

fn report(label: &str, elapsed: Duration) {
    println!("{}", format_report(label, elapsed));
}

#[must_use]
fn format_report(label: &str, elapsed: Duration) -> String {
    format!(
        "{:-<width$}--- {:.10}",
        format!("{label} COMPLETE "),
        elapsed.as_secs_f64(),
        width = LABEL_WIDTH
    )
}
