//! Unified error types for the Flurry client.

use reqwest::StatusCode;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while navigating a Flurry response body.
///
/// Absence of a looked-up parameter is *not* an error (lookups return
/// `Option`); these variants cover structural mismatches, e.g. a response
/// without the expected `parameters.key` node.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("missing field '{0}' in response")]
    MissingField(String),

    #[error("unexpected shape at '{path}': expected {expected}")]
    UnexpectedShape { path: String, expected: &'static str },
}

/// API request/response errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service reported an error payload (a body carrying a `code`
    /// field). Raised regardless of the HTTP status line; Flurry can ship
    /// these under 200 OK.
    #[error("Flurry error [{code}]: {message}")]
    Service { code: String, message: String },

    /// Non-2xx status without a decodable service error payload.
    #[error("HTTP error {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// The transport failed to complete the round trip (DNS, connect,
    /// timeout).
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("response navigation error: {0}")]
    Navigation(#[from] NavigationError),

    #[error("Failed to create HTTP client: {0}")]
    HttpClientInit(String),
}
