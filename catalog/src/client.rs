use crate::metrics_defs::{UPSTREAM_REQUEST_DURATION, UPSTREAM_REQUESTS};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::{Duration, Instant};

#[derive(thiserror::Error, Debug)]
pub enum UpstreamError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("{url} returned a body that is not JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl UpstreamError {
    fn outcome(&self) -> &'static str {
        match self {
            UpstreamError::Request { .. } => "request",
            UpstreamError::Timeout { .. } => "timeout",
            UpstreamError::Status { .. } => "status",
            UpstreamError::Decode { .. } => "decode",
        }
    }

    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            UpstreamError::Timeout { url }
        } else if error.is_decode() {
            UpstreamError::Decode { url, source: error }
        } else {
            UpstreamError::Request { url, source: error }
        }
    }
}

/// Issues single GET requests against the catalog API and decodes the JSON body.
///
/// There is no retry: the first failure is returned to the caller.
#[derive(Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub async fn get_json(&self, url: &str) -> Result<Value, UpstreamError> {
        let started = Instant::now();
        let result = self.fetch(url).await;
        let elapsed = started.elapsed();

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.outcome(),
        };
        shared::counter!(UPSTREAM_REQUESTS, "outcome" => outcome).increment(1);
        shared::histogram!(UPSTREAM_REQUEST_DURATION, "outcome" => outcome)
            .record(elapsed.as_secs_f64());
        tracing::debug!(url, outcome, elapsed_ms = elapsed.as_millis() as u64, "upstream call");

        result
    }

    async fn fetch(&self, url: &str) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::from_reqwest(url, e))
    }
}
