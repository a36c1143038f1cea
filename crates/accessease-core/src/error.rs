//! Error types for the assistant gateway and configuration.

use thiserror::Error;

/// Failures of a single live request. The gateway never hands these to its
/// callers; they are logged and replaced by the fallback reply.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid response format from Gemini API")]
    MalformedResponse,

    #[error("GEMINI_API_KEY not configured")]
    MissingApiKey,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
