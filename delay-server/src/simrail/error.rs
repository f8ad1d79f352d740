//! SimRail client error types.

/// Errors from the SimRail feeds.
#[derive(Debug, thiserror::Error)]
pub enum SimRailError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by SimRail API")]
    RateLimited,

    /// Requested resource does not exist upstream
    #[error("not found: {0}")]
    NotFound(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_ref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}

impl SimRailError {
    /// Whether the failure was a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SimRailError::Http(e) if e.is_timeout())
    }
}
