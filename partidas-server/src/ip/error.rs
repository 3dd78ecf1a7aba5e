//! Remote timetable client error types.

/// Errors from the remote timetable HTTP client.
///
/// Callers in the session layer never show these to the user: they are
/// logged and turned into an empty result or a generic message.
#[derive(Debug, thiserror::Error)]
pub enum IpError {
    /// Transport failure (connection refused, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The body was not the JSON shape we expect
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Client could not be built from its configuration
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_ref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}

impl IpError {
    /// Build a JSON error, keeping a bounded excerpt of the offending body.
    pub(crate) fn json(err: serde_json::Error, body: &str) -> Self {
        IpError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}
