use std::{
    future::Future,
    time::{Duration, Instant},
};

use mercury_report::{validate_report, validate_report_for, FeedId, ReportSchema};
use tokio::{sync::mpsc, task::JoinSet};
use tracing::{debug, info, warn};

use super::{LoadReport, Outcome, Sample};
use crate::client::{ClientError, MercuryClient};

/// Which endpoint the validators poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// `GET /client`, one block further per request.
    Legacy {
        /// Block number of the first request.
        start_block: u64,
    },
    /// `GET /api/v1/reports`, one second further per request.
    Latest {
        /// Timestamp of the first request.
        timestamp: u64,
    },
}

/// Shape of a load run.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Number of concurrent simulated validators.
    pub validators: usize,
    /// Requests each validator sends.
    pub requests_per_validator: usize,
    /// Pause between two requests of the same validator.
    pub interval: Duration,
    /// Feed to request.
    pub feed: FeedId,
    /// Endpoint to poll.
    pub mode: LoadMode,
}

/// Runs `config` against `client` and aggregates every sample.
///
/// One task is spawned per validator. The run ends once all of them have finished; a validator
/// that panics is counted in [`LoadReport::failed_validators`] and the others carry on.
pub async fn run_load(client: MercuryClient, config: LoadConfig) -> LoadReport {
    let (feed, mode) = (config.feed, config.mode);
    run_load_with(config, move |_, offset| {
        let client = client.clone();
        async move { fetch_and_validate(&client, feed, mode, offset).await }
    })
    .await
}

/// Like [`run_load`], with each request performed by `fetch(validator, offset)`.
///
/// `offset` is the index of the request within its validator, added to the starting block or
/// timestamp by [`run_load`].
pub async fn run_load_with<F, Fut>(config: LoadConfig, fetch: F) -> LoadReport
where
    F: Fn(usize, u64) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    let started = Instant::now();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut validators = JoinSet::new();

    info!(
        validators = config.validators,
        requests = config.requests_per_validator,
        feed = %config.feed,
        "starting load run"
    );
    for validator in 0..config.validators {
        let fetch = fetch.clone();
        let config = config.clone();
        let tx = tx.clone();
        validators.spawn(async move { run_validator(validator, &config, fetch, tx).await });
    }
    drop(tx);

    let mut samples = Vec::with_capacity(config.validators * config.requests_per_validator);
    while let Some(sample) = rx.recv().await {
        samples.push(sample);
    }

    let mut failed_validators = 0;
    while let Some(joined) = validators.join_next().await {
        if let Err(err) = joined {
            warn!(%err, "validator task failed");
            failed_validators += 1;
        }
    }

    let report =
        LoadReport::from_samples(config.validators, &samples, failed_validators, started.elapsed());
    info!(total = report.total, ok = report.ok, "load run finished");
    report
}

async fn run_validator<F, Fut>(
    validator: usize,
    config: &LoadConfig,
    fetch: F,
    tx: mpsc::UnboundedSender<Sample>,
) where
    F: Fn(usize, u64) -> Fut,
    Fut: Future<Output = Outcome>,
{
    for request in 0..config.requests_per_validator {
        if request > 0 && !config.interval.is_zero() {
            tokio::time::sleep(config.interval).await;
        }

        let started = Instant::now();
        let outcome = fetch(validator, request as u64).await;
        let sample = Sample { validator, latency: started.elapsed(), outcome };
        debug!(validator, request, outcome = ?sample.outcome, "sample");

        if tx.send(sample).is_err() {
            // Aggregator is gone.
            return;
        }
    }
}

async fn fetch_and_validate(
    client: &MercuryClient,
    feed: FeedId,
    mode: LoadMode,
    offset: u64,
) -> Outcome {
    let full = match mode {
        LoadMode::Legacy { start_block } => {
            client.get_legacy_report(feed, start_block.saturating_add(offset)).await
        }
        LoadMode::Latest { timestamp } => {
            match client.get_report(feed, timestamp.saturating_add(offset)).await {
                Ok(envelope) => envelope.decode(),
                Err(err) => Err(err),
            }
        }
    };
    let full = match full {
        Ok(full) => full,
        Err(ClientError::Report(err)) => return Outcome::Invalid(err.to_string()),
        Err(err) => return Outcome::FetchError(err.to_string()),
    };

    let validated = match mode {
        LoadMode::Legacy { .. } => full
            .report(ReportSchema::Legacy)
            .map_err(|err| err.to_string())
            .and_then(|report| validate_report(&report.to_map()).map_err(|err| err.to_string())),
        LoadMode::Latest { .. } => full.report_auto().map_err(|err| err.to_string()).and_then(
            |report| {
                validate_report_for(report.schema(), &report.to_map())
                    .map_err(|err| err.to_string())
            },
        ),
    };
    match validated {
        Ok(()) => Outcome::Ok,
        Err(reason) => Outcome::Invalid(reason),
    }
}
