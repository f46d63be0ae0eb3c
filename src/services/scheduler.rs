// src/services/scheduler.rs

//! Rate-limited batch scheduler.
//!
//! Partitions the identifier list into batches of `requests_limit` and
//! fetches each batch through a worker pool bounded by `max_concurrent`.
//! The two limits are deliberately independent: the batch size is the
//! provider's rate-limit window, the pool width is how many connections we
//! are willing to hold open at once.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;

use crate::error::FetchError;
use crate::models::raw::RawRecord;
use crate::models::{Environment, PackageId, SchedulerConfig};
use crate::services::PackageFetcher;

/// Result of one dispatched fetch, tagged with its identifier.
pub type FetchOutcome = (PackageId, Result<RawRecord, FetchError>);

/// Scheduler dispatching fetches in rate-limit-sized batches.
pub struct BatchScheduler {
    fetcher: PackageFetcher,
    config: SchedulerConfig,
}

impl BatchScheduler {
    /// Create a scheduler over the given fetcher.
    pub fn new(fetcher: PackageFetcher, config: SchedulerConfig) -> Self {
        Self { fetcher, config }
    }

    /// Dispatch fetches for `ids` and return the channel results arrive on.
    ///
    /// Results surface in completion order, not submission order; consumers
    /// must not assume any ordering across identifiers. One failed fetch
    /// never cancels or blocks its siblings. The channel closes once every
    /// dispatched fetch has reported.
    ///
    /// In development mode only the first batch is dispatched; the rest of
    /// the list is explicitly truncated. In production mode the scheduler
    /// sleeps the cool-down window between batches.
    pub fn run(&self, ids: Vec<PackageId>) -> mpsc::Receiver<FetchOutcome> {
        let (tx, rx) = mpsc::channel(self.config.max_concurrent.max(1));
        let fetcher = self.fetcher.clone();
        let config = self.config.clone();

        tokio::spawn(async move {
            let batch_size = config.requests_limit.max(1);
            let workers = config.max_concurrent.max(1);
            let total = ids.len();

            for (index, batch) in ids.chunks(batch_size).enumerate() {
                if index > 0 {
                    match config.environment {
                        Environment::Development => {
                            log::info!(
                                "development mode: stopping after the first batch, {} of {} identifiers not dispatched",
                                total - batch_size,
                                total
                            );
                            break;
                        }
                        Environment::Production => {
                            log::info!(
                                "rate-limit window: pausing {}s before batch {}",
                                config.cooldown_secs,
                                index + 1
                            );
                            tokio::time::sleep(Duration::from_secs(config.cooldown_secs)).await;
                        }
                    }
                }

                log::debug!("dispatching batch {} ({} identifiers)", index + 1, batch.len());
                let mut results = stream::iter(batch.iter().copied())
                    .map(|id| {
                        let fetcher = &fetcher;
                        async move { (id, fetcher.fetch(id).await) }
                    })
                    .buffer_unordered(workers);

                while let Some(outcome) = results.next().await {
                    // Consumer hung up; nothing left to do.
                    if tx.send(outcome).await.is_err() {
                        return;
                    }
                }
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::models::ProviderConfig;

    fn scheduler_for(server_uri: &str, config: SchedulerConfig) -> BatchScheduler {
        let provider = ProviderConfig {
            endpoint: format!("{server_uri}/api/packagedetails/"),
            api_key: "test-key".to_string(),
            ..ProviderConfig::default()
        };
        BatchScheduler::new(PackageFetcher::new(&provider).unwrap(), config)
    }

    async fn drain(mut rx: mpsc::Receiver<FetchOutcome>) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = rx.recv().await {
            outcomes.push(outcome);
        }
        outcomes
    }

    #[tokio::test]
    async fn development_mode_stops_after_first_batch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(5)
            .mount(&server)
            .await;

        let config = SchedulerConfig {
            requests_limit: 5,
            environment: Environment::Development,
            ..SchedulerConfig::default()
        };
        let scheduler = scheduler_for(&server.uri(), config);
        let outcomes = drain(scheduler.run((1..=12).collect())).await;

        // 12 identifiers, batch size 5: only the first batch runs.
        assert_eq!(outcomes.len(), 5);
        server.verify().await;
    }

    #[tokio::test]
    async fn every_dispatched_identifier_reports_exactly_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let config = SchedulerConfig {
            requests_limit: 8,
            max_concurrent: 3,
            environment: Environment::Development,
            ..SchedulerConfig::default()
        };
        let scheduler = scheduler_for(&server.uri(), config);
        let mut ids: Vec<PackageId> = drain(scheduler.run(vec![4, 8, 15, 16, 23]))
            .await
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![4, 8, 15, 16, 23]);
    }

    #[tokio::test]
    async fn failures_do_not_block_siblings() {
        let server = MockServer::start().await;
        // Every request 500s; all five outcomes must still surface.
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let config = SchedulerConfig {
            requests_limit: 5,
            environment: Environment::Development,
            ..SchedulerConfig::default()
        };
        let scheduler = scheduler_for(&server.uri(), config);
        let outcomes = drain(scheduler.run(vec![1, 2, 3, 4, 5])).await;
        assert_eq!(outcomes.len(), 5);
        assert!(outcomes.iter().all(|(_, result)| result.is_err()));
    }
}
