//! OpenAI API transport client.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::body::{JSON_CONTENT_TYPE, RequestBody};
use crate::config::ClientConfig;
use crate::error::{Error, ErrorResponse, RequestError, Result};

/// `OpenAI-Organization`, lowercased as `HeaderName` requires.
const ORGANIZATION_HEADER: &str = "openai-organization";

/// OpenAI API client.
///
/// Cheap to clone and safe to share between tasks: it holds only immutable
/// configuration and a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
    default_headers: Arc<HeaderMap>,
    cancellation: Option<CancellationToken>,
}

impl Client {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the API key or organization cannot be sent
    /// as an HTTP header, or if the default HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let default_headers = default_headers(&config)?;

        let http = match &config.http_client {
            Some(client) => client.clone(),
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = config.timeout {
                    builder = builder.timeout(timeout);
                }
                builder
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create HTTP client: {e}")))?
            }
        };

        Ok(Self {
            config: Arc::new(config),
            http,
            default_headers: Arc::new(default_headers),
            cancellation: None,
        })
    }

    /// Create a client from environment variables.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`] and [`Client::new`].
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Returns a handle whose calls abort with [`Error::Cancelled`] once
    /// `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancellation: Some(token),
            ..self.clone()
        }
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Build the absolute URL for an endpoint suffix such as `/images/generations`.
    pub(crate) fn full_url(&self, suffix: &str) -> String {
        format!("{}{}", self.config.base_url, suffix)
    }

    /// Sends a request and decodes the JSON response into `T`.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        suffix: &str,
        body: RequestBody,
    ) -> Result<T> {
        let bytes = self.send_raw(method, suffix, body).await?;
        serde_json::from_slice(&bytes).map_err(Error::Decode)
    }

    /// Sends a request and returns the raw body of a successful response.
    pub(crate) async fn send_raw(
        &self,
        method: Method,
        suffix: &str,
        body: RequestBody,
    ) -> Result<Vec<u8>> {
        let span = tracing::debug_span!(
            "openai.request",
            http.method = %method,
            url.path = suffix,
            body.kind = body.kind(),
            http.status_code = tracing::field::Empty,
        );

        let call = self.execute(method, suffix, body).instrument(span);

        match &self.cancellation {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => {
                    tracing::debug!(url.path = suffix, "request cancelled");
                    Err(Error::Cancelled)
                }
                result = call => result,
            },
            None => call.await,
        }
    }

    async fn execute(&self, method: Method, suffix: &str, body: RequestBody) -> Result<Vec<u8>> {
        let headers = merge_headers(&self.default_headers, body.headers());
        let url = self.full_url(suffix);

        tracing::debug!("sending request");

        let request = body.apply(self.http.request(method, url)).headers(headers);
        let response = request.send().await?;

        let status = response.status();
        tracing::Span::current().record("http.status_code", status.as_u16());

        if is_failure_status(status) {
            return Err(handle_error_response(response).await);
        }

        let bytes = response.bytes().await?;
        tracing::debug!(bytes = bytes.len(), "received response");

        Ok(bytes.to_vec())
    }

    /// Fails fast when the attached token is already cancelled.
    pub(crate) fn check_cancelled(&self) -> Result<()> {
        match &self.cancellation {
            Some(token) if token.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Headers sent with every request.
fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
        .map_err(|_| Error::config("API key contains characters not allowed in a header"))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    if let Some(org) = config.organization() {
        let value = HeaderValue::from_str(org)
            .map_err(|_| Error::config("organization contains characters not allowed in a header"))?;
        headers.insert(HeaderName::from_static(ORGANIZATION_HEADER), value);
    }

    Ok(headers)
}

/// Overlays `overrides` on top of `defaults`; overriding headers win.
fn merge_headers(defaults: &HeaderMap, overrides: HeaderMap) -> HeaderMap {
    let mut merged = defaults.clone();
    for (name, value) in &overrides {
        merged.insert(name.clone(), value.clone());
    }
    merged
}

/// Anything outside `[200, 400)` is a failure.
fn is_failure_status(status: StatusCode) -> bool {
    status.as_u16() < 200 || status.as_u16() >= 400
}

/// Turns a failed response into an [`Error::Api`] or [`Error::Request`].
async fn handle_error_response(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return RequestError::new(status, "", Some(Box::new(e))).into(),
    };

    decode_error_body(status, body)
}

fn decode_error_body(status: u16, body: String) -> Error {
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(ErrorResponse {
            error: Some(mut api_error),
        }) => {
            api_error.http_status_code = status;
            api_error.into()
        }
        Ok(ErrorResponse { error: None }) => RequestError::new(status, body, None).into(),
        Err(e) => RequestError::new(status, body, Some(Box::new(e))).into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn test_client() -> Client {
        Client::new(ClientConfig::new("test-key")).unwrap()
    }

    mod headers {
        use super::*;

        #[test]
        fn defaults_include_auth_accept_and_json() {
            let headers = default_headers(&ClientConfig::new("test-key")).unwrap();

            assert_eq!(headers[AUTHORIZATION], "Bearer test-key");
            assert!(headers[AUTHORIZATION].is_sensitive());
            assert_eq!(headers[ACCEPT], JSON_CONTENT_TYPE);
            assert_eq!(headers[CONTENT_TYPE], JSON_CONTENT_TYPE);
            assert!(!headers.contains_key(ORGANIZATION_HEADER));
        }

        #[test]
        fn organization_only_when_configured() {
            let config = ClientConfig::new("k").with_organization("org-42");
            let headers = default_headers(&config).unwrap();
            assert_eq!(headers[ORGANIZATION_HEADER], "org-42");

            let config = ClientConfig::new("k").with_organization("");
            let headers = default_headers(&config).unwrap();
            assert!(!headers.contains_key(ORGANIZATION_HEADER));
        }

        #[test]
        fn rejects_unsendable_api_key() {
            let err = Client::new(ClientConfig::new("bad\nkey")).unwrap_err();
            assert!(matches!(err, Error::Config(_)));
        }

        #[test]
        fn overrides_win_over_defaults() {
            let defaults = default_headers(&ClientConfig::new("k")).unwrap();
            let mut overrides = HeaderMap::new();
            overrides.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("multipart/form-data; boundary=abc"),
            );

            let merged = merge_headers(&defaults, overrides);

            assert_eq!(merged[CONTENT_TYPE], "multipart/form-data; boundary=abc");
            assert_eq!(merged[AUTHORIZATION], "Bearer k");
            assert_eq!(merged.get_all(CONTENT_TYPE).iter().count(), 1);
        }
    }

    mod status {
        use super::*;

        #[test]
        fn classifies_failure_range() {
            assert!(!is_failure_status(StatusCode::OK));
            assert!(!is_failure_status(StatusCode::NO_CONTENT));
            assert!(!is_failure_status(StatusCode::FOUND));
            assert!(is_failure_status(StatusCode::BAD_REQUEST));
            assert!(is_failure_status(StatusCode::INTERNAL_SERVER_ERROR));
            assert!(is_failure_status(StatusCode::CONTINUE));
        }
    }

    mod error_body {
        use super::*;

        #[test]
        fn structured_error_gets_status() {
            let body = r#"{"error":{"message":"bad request","type":"invalid_request_error","param":"n","code":null}}"#;
            let err = decode_error_body(400, body.to_owned());

            let Error::Api(api) = err else {
                panic!("expected API error, got {err:?}");
            };
            assert_eq!(api.http_status_code, 400);
            assert_eq!(api.message, "bad request");
            assert_eq!(api.error_type, "invalid_request_error");
            assert_eq!(api.param.as_deref(), Some("n"));
        }

        #[test]
        fn html_body_keeps_status() {
            let err = decode_error_body(500, "<html><body>Bad Gateway</body></html>".to_owned());

            let Error::Request(req) = err else {
                panic!("expected request error, got {err:?}");
            };
            assert_eq!(req.http_status_code, 500);
            assert!(req.source.is_some());
            assert!(req.body.contains("Bad Gateway"));
        }

        #[test]
        fn envelope_without_error_object() {
            let err = decode_error_body(503, r#"{"status":"down"}"#.to_owned());

            let Error::Request(req) = err else {
                panic!("expected request error, got {err:?}");
            };
            assert_eq!(req.http_status_code, 503);
            assert!(req.source.is_none());
        }

        #[test]
        fn empty_body_keeps_status() {
            let err = decode_error_body(404, String::new());
            assert_eq!(err.http_status(), Some(404));
        }
    }

    #[test]
    fn full_url_concatenates_verbatim() {
        let client = test_client();
        assert_eq!(
            client.full_url("/audio/transcriptions"),
            "https://api.openai.com/v1/audio/transcriptions"
        );
    }

    #[test]
    fn cancellation_is_checked_up_front() {
        let token = CancellationToken::new();
        let client = test_client().with_cancellation(token.clone());
        assert!(client.check_cancelled().is_ok());

        token.cancel();
        assert!(client.check_cancelled().unwrap_err().is_cancelled());
        assert!(test_client().check_cancelled().is_ok());
    }
}
