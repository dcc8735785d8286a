//! Client configuration.

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Configuration for the [`Client`](crate::Client).
///
/// The API key is write-once: it is set by [`ClientConfig::new`] or
/// [`ClientConfig::from_env`] and never exposed through `Debug`.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    /// Base URL for the API (defaults to OpenAI's API).
    pub base_url: String,
    /// Optional organization ID, sent as `OpenAI-Organization`.
    pub organization: Option<String>,
    /// Custom HTTP transport. When set, `timeout` is ignored.
    pub http_client: Option<reqwest::Client>,
    /// Request timeout for the default transport.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Default OpenAI API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    /// Creates a new configuration with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            organization: None,
            http_client: None,
            timeout: None,
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Reads from:
    /// - `OPENAI_API_KEY` - Required API key
    /// - `OPENAI_BASE_URL` - Optional base URL
    /// - `OPENAI_ORGANIZATION` - Optional organization ID
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `OPENAI_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| Error::config("OPENAI_API_KEY environment variable not set"))?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        config.organization = std::env::var("OPENAI_ORGANIZATION").ok();

        Ok(config)
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the organization ID.
    #[must_use]
    pub fn with_organization(mut self, org: impl Into<String>) -> Self {
        self.organization = Some(org.into());
        self
    }

    /// Uses a preconfigured HTTP client (proxy, TLS, timeouts).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the request timeout of the default HTTP client.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The organization ID, if configured and non-empty.
    pub(crate) fn organization(&self) -> Option<&str> {
        self.organization.as_deref().filter(|org| !org.is_empty())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("http_client", &self.http_client.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = ClientConfig::new("test-key");
        assert_eq!(config.api_key(), "test-key");
        assert_eq!(config.base_url, ClientConfig::DEFAULT_BASE_URL);
        assert!(config.organization.is_none());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new("key")
            .with_base_url("http://localhost:8080/v1")
            .with_organization("org-123")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.organization(), Some("org-123"));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_empty_organization_is_ignored() {
        let config = ClientConfig::new("key").with_organization("");
        assert_eq!(config.organization(), None);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("sk-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
