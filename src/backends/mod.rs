//! Backend adapters: one [`Run`](crate::run::Run) implementation per HTTP
//! client ecosystem.
//!
//! The adapters differ only in the client they delegate to; the operation
//! menu and its ordering/error contracts are identical, which is what makes
//! cross-backend timings comparable. Every batch invocation opens exactly
//! one client, shares it across that batch's requests, and releases it when
//! the invocation returns.

mod hyper;
mod reqwest;
mod wreq;


pub use self::hyper::HyperRun;
pub use self::reqwest::ReqwestRun;
pub use self::wreq::WreqRun;

use crate::run::{Backend, Run, RunLimits};

/// Constructs the adapter for the selected backend.
#[must_use]
pub fn make_run(backend: Backend, limits: RunLimits) -> Box<dyn Run> {
    match backend {
        Backend::Reqwest => Box::new(ReqwestRun::new(limits)),
        Backend::Wreq => Box::new(WreqRun::new(limits)),
        Backend::Hyper => Box::new(HyperRun::new(limits)),
    }
}
