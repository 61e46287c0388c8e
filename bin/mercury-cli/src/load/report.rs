use std::time::Duration;

use serde::Serialize;

/// Result of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "reason")]
pub enum Outcome {
    /// Fetched, decoded and validated.
    Ok,
    /// The request itself failed.
    FetchError(String),
    /// The server answered with a report that does not decode or validate.
    Invalid(String),
}

/// One request as observed by a validator.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Index of the validator that sent the request.
    pub validator: usize,
    /// Wall time from send to validated result.
    pub latency: Duration,
    /// What happened.
    pub outcome: Outcome,
}

/// Latency distribution in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyStats {
    /// Fastest request.
    pub min_ms: f64,
    /// Slowest request.
    pub max_ms: f64,
    /// Arithmetic mean.
    pub mean_ms: f64,
    /// Median, nearest rank.
    pub p50_ms: f64,
    /// 95th percentile, nearest rank.
    pub p95_ms: f64,
}

impl LatencyStats {
    /// Summarises `latencies`. Returns `None` when there are none.
    pub fn from_latencies(latencies: &[Duration]) -> Option<Self> {
        if latencies.is_empty() {
            return None;
        }
        let mut sorted = latencies.to_vec();
        sorted.sort_unstable();

        let total: Duration = sorted.iter().sum();
        let mean = millis(total) / sorted.len() as f64;
        Some(Self {
            min_ms: millis(sorted[0]),
            max_ms: millis(sorted[sorted.len() - 1]),
            mean_ms: mean,
            p50_ms: millis(nearest_rank(&sorted, 50)),
            p95_ms: millis(nearest_rank(&sorted, 95)),
        })
    }
}

/// Nearest-rank percentile of a non-empty sorted slice.
fn nearest_rank(sorted: &[Duration], percentile: usize) -> Duration {
    let rank = (percentile * sorted.len()).div_ceil(100).max(1);
    sorted[rank.min(sorted.len()) - 1]
}

fn millis(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

/// Aggregated result of a load run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Requests sent.
    pub total: usize,
    /// Requests that returned a valid report.
    pub ok: usize,
    /// Requests that failed in transport or with an error status.
    pub fetch_errors: usize,
    /// Requests that returned an undecodable or invalid report.
    pub invalid: usize,
    /// Validators whose task died before finishing.
    pub failed_validators: usize,
    /// Successful requests per validator, indexed by validator.
    pub ok_per_validator: Vec<usize>,
    /// Latency over all requests, if any were sent.
    pub latency: Option<LatencyStats>,
    /// Distinct failure reasons, first occurrence order.
    pub errors: Vec<String>,
    /// Wall time of the whole run in milliseconds.
    pub elapsed_ms: f64,
}

impl LoadReport {
    /// Aggregates samples collected from `validators` validators.
    pub fn from_samples(
        validators: usize,
        samples: &[Sample],
        failed_validators: usize,
        elapsed: Duration,
    ) -> Self {
        let mut report = Self {
            total: samples.len(),
            ok: 0,
            fetch_errors: 0,
            invalid: 0,
            failed_validators,
            ok_per_validator: vec![0; validators],
            latency: None,
            errors: Vec::new(),
            elapsed_ms: millis(elapsed),
        };

        for sample in samples {
            let reason = match &sample.outcome {
                Outcome::Ok => {
                    report.ok += 1;
                    if let Some(count) = report.ok_per_validator.get_mut(sample.validator) {
                        *count += 1;
                    }
                    continue;
                }
                Outcome::FetchError(reason) => {
                    report.fetch_errors += 1;
                    reason
                }
                Outcome::Invalid(reason) => {
                    report.invalid += 1;
                    reason
                }
            };
            if !report.errors.contains(reason) {
                report.errors.push(reason.clone());
            }
        }

        let latencies: Vec<_> = samples.iter().map(|sample| sample.latency).collect();
        report.latency = LatencyStats::from_latencies(&latencies);
        report
    }

    /// Whether every request succeeded and every validator finished.
    pub const fn is_clean(&self) -> bool {
        self.ok == self.total && self.failed_validators == 0
    }
}
