//! Error types for openai-lite.
//!
//! Every call returns exactly one of a decoded result or an [`Error`]. Failed
//! HTTP responses come in two shapes:
//! - [`ApiError`] when the body matches the service's documented error schema
//! - [`RequestError`] when it does not (plain-text gateway pages, empty bodies),
//!   so the HTTP status is never lost

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;

/// Result type alias for openai-lite operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for openai-lite.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The service answered with a structured error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The service answered with a failure status and an unusable body.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Network or connection failure before a response was received.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The outgoing request body could not be built.
    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    /// A successful response did not match the expected schema.
    #[error("Decoding error: {0}")]
    Decode(#[source] serde_json::Error),

    /// Base64 image payload could not be decoded.
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The call was aborted through its cancellation token.
    #[error("Request cancelled")]
    Cancelled,

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// HTTP status code of a failed response, if the error came from one.
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => Some(err.http_status_code),
            Self::Request(err) => Some(err.http_status_code),
            _ => None,
        }
    }

    /// Returns the structured service error, if any.
    #[must_use]
    pub const fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Check if this error was caused by cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Failure to build an outgoing request body.
///
/// Raised before any network call is made.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// The upload file could not be opened or read.
    #[error("reading file {}: {source}", .path.display())]
    File {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization failed.
    #[error("marshaling request: {0}")]
    Json(#[from] serde_json::Error),

    /// A multipart part could not be assembled.
    #[error("creating form part: {0}")]
    Part(#[source] reqwest::Error),
}

/// Envelope of an error body returned by the service.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// Error reported by the service in its documented JSON schema.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[non_exhaustive]
pub struct ApiError {
    /// Machine-readable code; a string or a number depending on the endpoint.
    #[serde(default)]
    pub code: Option<Value>,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Name of the offending request parameter.
    #[serde(default)]
    pub param: Option<String>,
    /// Error category, e.g. `invalid_request_error`.
    #[serde(default, rename = "type")]
    pub error_type: String,
    /// HTTP status of the response that carried this error (0 if unknown).
    #[serde(skip)]
    pub http_status_code: u16,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.http_status_code > 0 {
            write!(
                f,
                "error, status code: {}, message: {}",
                self.http_status_code, self.message
            )
        } else {
            f.write_str(&self.message)
        }
    }
}

impl std::error::Error for ApiError {}

/// A failed response whose body could not be read as a service error.
#[derive(Debug)]
#[non_exhaustive]
pub struct RequestError {
    /// HTTP status of the response.
    pub http_status_code: u16,
    /// Raw response body, as far as it could be read.
    pub body: String,
    /// Why the body was unusable; `None` when it parsed but had no error object.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RequestError {
    pub(crate) fn new(
        http_status_code: u16,
        body: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            http_status_code,
            body: body.into(),
            source,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error, status code: {}, message: ", self.http_status_code)?;
        match &self.source {
            Some(source) => write!(f, "{source}"),
            None => f.write_str("missing error object in response body"),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}
