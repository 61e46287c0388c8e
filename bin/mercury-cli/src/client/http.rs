//! Client for the Mercury server's HTTP API.

use std::time::Duration;

use mercury_report::{FeedId, FullReport};
use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{auth::signed_path, now_ms, ClientError, Credentials, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for a Mercury server.
#[derive(Debug, Clone)]
pub struct MercuryConfig {
    /// Base URL of the server.
    pub url: Url,
    /// Credentials used to sign requests. Requests are sent unsigned when absent.
    pub credentials: Option<Credentials>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl MercuryConfig {
    /// Unauthenticated configuration for `url`.
    pub const fn new(url: Url) -> Self {
        Self { url, credentials: None, timeout: DEFAULT_TIMEOUT }
    }

    /// Sets the credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the request timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Body of `GET /client`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainlinkBlobResponse {
    /// Hex-encoded full report.
    pub chainlink_blob: String,
}

/// One report as returned by the v0.3 API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEnvelope {
    /// Feed the report belongs to.
    #[serde(rename = "feedID")]
    pub feed_id: FeedId,
    /// Start of the report's validity window.
    pub valid_from_timestamp: u64,
    /// Observation time.
    pub observations_timestamp: u64,
    /// Hex-encoded full report.
    pub full_report: String,
}

impl ReportEnvelope {
    /// Decodes the attached full report.
    pub fn decode(&self) -> Result<FullReport> {
        Ok(FullReport::from_hex(&self.full_report)?)
    }
}

#[derive(Debug, Deserialize)]
struct SingleReportResponse {
    report: ReportEnvelope,
}

#[derive(Debug, Deserialize)]
struct BulkReportResponse {
    reports: Vec<ReportEnvelope>,
}

/// HTTP client for a Mercury server.
#[derive(Debug, Clone)]
pub struct MercuryClient {
    http: reqwest::Client,
    config: MercuryConfig,
}

impl MercuryClient {
    /// Builds a client. The base URL is treated as a directory.
    pub fn new(mut config: MercuryConfig) -> Result<Self> {
        if !config.url.path().ends_with('/') {
            let path = format!("{}/", config.url.path());
            config.url.set_path(&path);
        }
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Base URL requests are resolved against.
    pub const fn base_url(&self) -> &Url {
        &self.config.url
    }

    /// Fetches the v0.2 report of `feed` at `block_number` from `GET /client`.
    pub async fn get_legacy_report(&self, feed: FeedId, block_number: u64) -> Result<FullReport> {
        let body: ChainlinkBlobResponse = self
            .get_json(
                "client",
                &[("feedIdHex", feed.to_string()), ("blockNumber", block_number.to_string())],
            )
            .await?;
        Ok(FullReport::from_hex(&body.chainlink_blob)?)
    }

    /// Fetches the latest v0.3 report of `feed` at or before `timestamp`.
    pub async fn get_report(&self, feed: FeedId, timestamp: u64) -> Result<ReportEnvelope> {
        let body: SingleReportResponse = self
            .get_json(
                "api/v1/reports",
                &[("feedID", feed.to_string()), ("timestamp", timestamp.to_string())],
            )
            .await?;
        Ok(body.report)
    }

    /// Fetches v0.3 reports of several feeds in one request.
    pub async fn get_reports_bulk(
        &self,
        feeds: &[FeedId],
        timestamp: u64,
    ) -> Result<Vec<ReportEnvelope>> {
        let ids = feeds.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        let body: BulkReportResponse = self
            .get_json("api/v1/reports/bulk", &[("feedIDs", ids), ("timestamp", timestamp.to_string())])
            .await?;
        Ok(body.reports)
    }

    /// Whether the configured credentials hold the admin role.
    pub async fn is_admin(&self) -> Result<bool> {
        let response = self.get("admin/user", &[]).await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::UNAUTHORIZED => Ok(false),
            _ => Err(status_error(response).await),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.get(path, query).await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let mut url = self.config.url.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        let mut request = self.http.get(url.clone());
        if let Some(credentials) = &self.config.credentials {
            for (name, value) in credentials.headers("GET", &signed_path(&url), &[], now_ms())? {
                request = request.header(name, value);
            }
        }

        debug!(%url, "GET");
        let response = request.send().await?;
        debug!(%url, status = %response.status(), "response");
        Ok(response)
    }
}

async fn status_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ClientError::Status { status, body }
}
