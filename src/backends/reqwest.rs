use async_trait::async_trait;
use reqwest::Client;

use crate::error::{RunError, RunResult};
use crate::run::{Backend, Discipline, Run, RunCore, RunLimits, resolve_batch};
use crate::sched::Scheduling;

/// Adapter delegating to the `reqwest` client, blocking and async.
#[derive(Debug)]
pub struct ReqwestRun {
    core: RunCore,
}

impl ReqwestRun {
    #[must_use]
    pub fn new(limits: RunLimits) -> Self {
        ReqwestRun {
            core: RunCore::new(limits),
        }
    }

    async fn fetch(client: Client, url: String) -> RunResult<String> {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|err| RunError::Reqwest { source: err })?;
        response
            .text()
            .await
            .map_err(|err| RunError::Reqwest { source: err })
    }
}

#[async_trait]
impl Run for ReqwestRun {
    fn backend(&self) -> Backend {
        Backend::Reqwest
    }

    fn core(&self) -> &RunCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RunCore {
        &mut self.core
    }

    fn single_sync(&self, url: &str) -> RunResult<String> {
        let response =
            reqwest::blocking::get(url).map_err(|err| RunError::Reqwest { source: err })?;
        response
            .text()
            .map_err(|err| RunError::Reqwest { source: err })
    }

    fn batch_sync(&self, urls: &[String]) -> RunResult<Vec<String>> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|err| RunError::BuildReqwestClient { source: err })?;
        let mut bodies = Vec::with_capacity(urls.len());
        for url in urls {
            let response = client
                .get(url)
                .send()
                .map_err(|err| RunError::Reqwest { source: err })?;
            bodies.push(
                response
                    .text()
                    .map_err(|err| RunError::Reqwest { source: err })?,
            );
        }
        Ok(bodies)
    }

    async fn batch_async(
        &self,
        urls: &[String],
        discipline: Discipline,
        scheduling: Scheduling,
    ) -> RunResult<Vec<String>> {
        let client = Client::builder()
            .build()
            .map_err(|err| RunError::BuildReqwestClient { source: err })?;
        resolve_batch(urls, discipline, scheduling, move |url| {
            Self::fetch(client.clone(), url)
        })
        .await
    }
}
