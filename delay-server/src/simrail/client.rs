//! SimRail HTTP client.
//!
//! Provides async access to the public SimRail panel and timetable APIs.
//! Handles request limiting, status mapping and conversion to domain types.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{LiveTrain, Station, Timetable, TrainNumber};

use super::convert::{stations_from_json, timetable_from_json, trains_from_json};
use super::error::SimRailError;
use super::feed::SimRailFeed;

/// Default base URL for the live panel (trains and stations).
const DEFAULT_PANEL_URL: &str = "https://panel.simrail.eu:8084";

/// Default base URL for the timetable API.
const DEFAULT_API_URL: &str = "https://api1.aws.simrail.eu:8082";

/// Default multiplayer server.
const DEFAULT_SERVER_CODE: &str = "cz1";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default per-request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// How much of an unparseable body to keep in errors.
const BODY_SNIPPET_CHARS: usize = 500;

/// Configuration for the SimRail client.
#[derive(Debug, Clone)]
pub struct SimRailConfig {
    /// Base URL of the live panel API
    pub panel_url: String,
    /// Base URL of the timetable API
    pub api_url: String,
    /// Multiplayer server code, e.g. "cz1" or "pl2"
    pub server_code: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SimRailConfig {
    /// Create a config for the given server code.
    pub fn new(server_code: impl Into<String>) -> Self {
        Self {
            panel_url: DEFAULT_PANEL_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            server_code: server_code.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom panel URL (for testing).
    pub fn with_panel_url(mut self, url: impl Into<String>) -> Self {
        self.panel_url = url.into();
        self
    }

    /// Set a custom timetable API URL (for testing).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for SimRailConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_CODE)
    }
}

/// SimRail API client.
///
/// Uses a semaphore to limit concurrent requests to the public endpoints.
#[derive(Debug, Clone)]
pub struct SimRailClient {
    http: reqwest::Client,
    panel_url: String,
    api_url: String,
    server_code: String,
    semaphore: Arc<Semaphore>,
}

impl SimRailClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SimRailConfig) -> Result<Self, SimRailError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("delay-server/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            panel_url: config.panel_url.trim_end_matches('/').to_string(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            server_code: config.server_code,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// The server code every request is scoped to.
    pub fn server_code(&self) -> &str {
        &self.server_code
    }

    /// Fetch the station directory.
    pub async fn get_stations(&self) -> Result<Vec<Station>, SimRailError> {
        let url = format!("{}/stations-open", self.panel_url);
        let body = self
            .get_body(&url, &[("serverCode", self.server_code.as_str())])
            .await?;

        stations_from_json(&body).map_err(|e| json_error(e, &body))
    }

    /// Fetch the live train roster.
    pub async fn get_trains(&self) -> Result<Vec<LiveTrain>, SimRailError> {
        let url = format!("{}/trains-open", self.panel_url);
        let body = self
            .get_body(&url, &[("serverCode", self.server_code.as_str())])
            .await?;

        trains_from_json(&body).map_err(|e| json_error(e, &body))
    }

    /// Fetch the timetable of one train.
    ///
    /// Upstream answers an unknown train with an empty list rather than an
    /// error, so the result may be empty.
    pub async fn get_timetable(&self, train: &TrainNumber) -> Result<Timetable, SimRailError> {
        let url = format!("{}/api/getAllTimetables", self.api_url);
        let body = self
            .get_body(
                &url,
                &[
                    ("serverCode", self.server_code.as_str()),
                    ("train", train.as_str()),
                ],
            )
            .await?;

        timetable_from_json(&body).map_err(|e| json_error(e, &body))
    }

    /// Issue a GET and return the body of a successful response.
    async fn get_body(&self, url: &str, query: &[(&str, &str)]) -> Result<String, SimRailError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| SimRailError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        debug!(url, ?query, "requesting SimRail feed");

        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SimRailError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SimRailError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SimRailError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

fn json_error(e: serde_json::Error, body: &str) -> SimRailError {
    SimRailError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
    }
}

impl SimRailFeed for SimRailClient {
    async fn fetch_stations(&self) -> Result<Vec<Station>, SimRailError> {
        self.get_stations().await
    }

    async fn fetch_trains(&self) -> Result<Vec<LiveTrain>, SimRailError> {
        self.get_trains().await
    }

    async fn fetch_timetable(&self, train: &TrainNumber) -> Result<Timetable, SimRailError> {
        self.get_timetable(train).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = SimRailConfig::new("pl2")
            .with_panel_url("http://localhost:8084")
            .with_api_url("http://localhost:8082")
            .with_max_concurrent(10)
            .with_timeout(2);

        assert_eq!(config.server_code, "pl2");
        assert_eq!(config.panel_url, "http://localhost:8084");
        assert_eq!(config.api_url, "http://localhost:8082");
        assert_eq!(config.max_concurrent, 10);
        assert_eq!(config.timeout_secs, 2);
    }

    #[test]
    fn config_defaults() {
        let config = SimRailConfig::default();

        assert_eq!(config.server_code, DEFAULT_SERVER_CODE);
        assert_eq!(config.panel_url, DEFAULT_PANEL_URL);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn client_creation_trims_trailing_slash() {
        let config = SimRailConfig::new("cz1").with_panel_url("http://localhost:8084/");
        let client = SimRailClient::new(config).unwrap();
        assert_eq!(client.panel_url, "http://localhost:8084");
        assert_eq!(client.server_code(), "cz1");
    }

    #[test]
    fn json_error_truncates_body() {
        let body = "x".repeat(2_000);
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        match json_error(err, &body) {
            SimRailError::Json { body: Some(b), .. } => assert_eq!(b.len(), BODY_SNIPPET_CHARS),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_an_http_error() {
        let config = SimRailConfig::new("cz1")
            .with_panel_url("http://127.0.0.1:9")
            .with_timeout(1);
        let client = SimRailClient::new(config).unwrap();

        let result = client.get_trains().await;
        assert!(matches!(result, Err(SimRailError::Http(_))));
    }
}
