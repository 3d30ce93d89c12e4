use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::Uri;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tokio::runtime::Runtime;

use crate::error::{RunError, RunResult};
use crate::run::{Backend, Discipline, Run, RunCore, RunLimits, resolve_batch};
use crate::sched::Scheduling;

type HyperClient = Client<HttpConnector, Empty<Bytes>>;

/// Adapter delegating to the low-level `hyper` client (via `hyper-util`).
///
/// Speaks plain HTTP only; the synchronous operations drive a dedicated
/// current-thread runtime for their duration, so call them from
/// synchronous context.
#[derive(Debug)]
pub struct HyperRun {
    core: RunCore,
}

impl HyperRun {
    #[must_use]
    pub fn new(limits: RunLimits) -> Self {
        HyperRun {
            core: RunCore::new(limits),
        }
    }

    fn build_client() -> HyperClient {
        Client::builder(TokioExecutor::new()).build_http()
    }

    fn build_runtime() -> RunResult<Runtime> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| RunError::BuildRuntime { source: err })
    }

    async fn fetch(client: HyperClient, url: String) -> RunResult<String> {
        let uri: Uri = url.parse().map_err(|err| RunError::InvalidUrl {
            url: url.clone(),
            source: err,
        })?;
        let response = client
            .get(uri)
            .await
            .map_err(|err| RunError::Hyper { source: err })?;
        let collected = response
            .into_body()
            .collect()
            .await
            .map_err(|err| RunError::ReadBody { source: err })?;
        String::from_utf8(collected.to_bytes().to_vec())
            .map_err(|err| RunError::DecodeBody { source: err })
    }
}

#[async_trait]
impl Run for HyperRun {
    fn backend(&self) -> Backend {
        Backend::Hyper
    }

    fn core(&self) -> &RunCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RunCore {
        &mut self.core
    }

    fn single_sync(&self, url: &str) -> RunResult<String> {
        let runtime = Self::build_runtime()?;
        let url = url.to_owned();
        runtime.block_on(Self::fetch(Self::build_client(), url))
    }

    fn batch_sync(&self, urls: &[String]) -> RunResult<Vec<String>> {
        let runtime = Self::build_runtime()?;
        runtime.block_on(async {
            let client = Self::build_client();
            let mut bodies = Vec::with_capacity(urls.len());
            for url in urls {
                bodies.push(Self::fetch(client.clone(), url.clone()).await?);
            }
            Ok(bodies)
        })
    }

    async fn batch_async(
        &self,
        urls: &[String],
        discipline: Discipline,
        scheduling: Scheduling,
    ) -> RunResult<Vec<String>> {
        let client = Self::build_client();
        resolve_batch(urls, discipline, scheduling, move |url| {
            Self::fetch(client.clone(), url)
        })
        .await
    }
}
