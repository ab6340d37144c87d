//! Leaderboard service transport
//!
//! Two logical operations (submit, fetch top N) plus a health probe. Any
//! failure, network or status, looks the same to the retry logic.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use super::record::{ScoreRecord, ScoreSubmission};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Remote leaderboard operations
#[allow(async_fn_in_trait)]
pub trait LeaderboardTransport {
    /// Store one record
    async fn submit(&self, entry: &ScoreSubmission) -> Result<(), TransportError>;
    /// Top `limit` records, best first
    async fn fetch_top(&self, limit: usize) -> Result<Vec<ScoreRecord>, TransportError>;
    async fn health(&self) -> Result<(), TransportError>;
}

/// Fetch responses come either bare or wrapped in `{ "scores": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TopScoresResponse {
    Bare(Vec<ScoreRecord>),
    Wrapped { scores: Vec<ScoreRecord> },
}

impl TopScoresResponse {
    fn into_records(self) -> Vec<ScoreRecord> {
        match self {
            TopScoresResponse::Bare(records) => records,
            TopScoresResponse::Wrapped { scores } => scores,
        }
    }
}

/// JSON over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn check_status(response: &reqwest::Response) -> Result<(), TransportError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::Status(status.as_u16()))
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client(timeout: Duration) -> Result<reqwest::Client, TransportError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

// The browser's fetch owns timeouts on wasm
#[cfg(target_arch = "wasm32")]
fn build_client(_timeout: Duration) -> Result<reqwest::Client, TransportError> {
    Ok(reqwest::Client::new())
}

impl LeaderboardTransport for HttpTransport {
    async fn submit(&self, entry: &ScoreSubmission) -> Result<(), TransportError> {
        let response = self
            .client
            .post(format!("{}/scores", self.base_url))
            .json(entry)
            .send()
            .await?;
        Self::check_status(&response)?;
        Ok(())
    }

    async fn fetch_top(&self, limit: usize) -> Result<Vec<ScoreRecord>, TransportError> {
        let response = self
            .client
            .get(format!("{}/scores", self.base_url))
            .query(&[("limit", limit)])
            .send()
            .await?;
        Self::check_status(&response)?;
        let body: TopScoresResponse = response.json().await?;
        Ok(body.into_records())
    }

    async fn health(&self) -> Result<(), TransportError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Self::check_status(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_bare_and_wrapped_responses() {
        let record = r#"{"playerName":"Al","score":150,"level":2,"timestamp":"2024-05-01T12:00:00Z"}"#;

        let bare: TopScoresResponse = serde_json::from_str(&format!("[{record}]")).unwrap();
        assert_eq!(bare.into_records().len(), 1);

        let wrapped: TopScoresResponse =
            serde_json::from_str(&format!(r#"{{"scores":[{record},{record}]}}"#)).unwrap();
        assert_eq!(wrapped.into_records().len(), 2);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let transport =
            HttpTransport::new("http://localhost:3000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:3000/api");
    }
}
