use async_trait::async_trait;
use tokio::runtime::Runtime;
use wreq::Client;

use crate::error::{RunError, RunResult};
use crate::run::{Backend, Discipline, Run, RunCore, RunLimits, resolve_batch};
use crate::sched::Scheduling;

/// Adapter delegating to the `wreq` client.
///
/// `wreq` is async-only, so the synchronous operations drive a dedicated
/// current-thread runtime for their duration; call them from synchronous
/// context.
#[derive(Debug)]
pub struct WreqRun {
    core: RunCore,
}

impl WreqRun {
    #[must_use]
    pub fn new(limits: RunLimits) -> Self {
        WreqRun {
            core: RunCore::new(limits),
        }
    }

    fn build_client() -> RunResult<Client> {
        Client::builder()
            .build()
            .map_err(|err| RunError::BuildWreqClient { source: err })
    }

    fn build_runtime() -> RunResult<Runtime> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| RunError::BuildRuntime { source: err })
    }

    async fn fetch(client: Client, url: String) -> RunResult<String> {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|err| RunError::Wreq { source: err })?;
        response
            .text()
            .await
            .map_err(|err| RunError::Wreq { source: err })
    }
}

#[async_trait]
impl Run for WreqRun {
    fn backend(&self) -> Backend {
        Backend::Wreq
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
        runtime.block_on(async move {
            let client = Self::build_client()?;
            Self::fetch(client, url).await
        })
    }

    fn batch_sync(&self, urls: &[String]) -> RunResult<Vec<String>> {
        let runtime = Self::build_runtime()?;
        runtime.block_on(async {
            let client = Self::build_client()?;
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
        let client = Self::build_client()?;
        resolve_batch(urls, discipline, scheduling, move |url| {
            Self::fetch(client.clone(), url)
        })
        .await
    }
}
