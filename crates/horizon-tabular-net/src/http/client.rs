//! The client and its limits.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::redirect::Policy;

use super::request::HttpRequestBuilder;
use crate::error::Result;

/// Default time allowed for a whole request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Default time allowed for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default number of redirects followed.
pub const DEFAULT_REDIRECT_LIMIT: usize = 5;
/// Default largest accepted body, 16 MiB.
pub const DEFAULT_BODY_LIMIT: u64 = 16 * 1024 * 1024;

/// Limits applied to every request of a client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Time allowed for a whole request, body included.
    pub request_timeout: Duration,
    /// Time allowed for establishing a connection.
    pub connect_timeout: Duration,
    /// Redirects followed before giving up. Zero follows none.
    pub redirect_limit: usize,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Largest body [`HttpResponse::bytes`](super::HttpResponse::bytes)
    /// reads. `None` reads any size.
    pub body_limit: Option<u64>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            redirect_limit: DEFAULT_REDIRECT_LIMIT,
            user_agent: concat!("horizon-tabular/", env!("CARGO_PKG_VERSION")).to_string(),
            body_limit: Some(DEFAULT_BODY_LIMIT),
        }
    }
}

/// Builds an [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    /// Starts from the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from `config`.
    pub fn from_config(config: HttpClientConfig) -> Self {
        Self { config }
    }

    /// Sets the whole-request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Sets how many redirects are followed.
    pub fn redirect_limit(mut self, limit: usize) -> Self {
        self.config.redirect_limit = limit;
        self
    }

    /// Sets the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Sets the largest accepted body; `None` accepts any size.
    pub fn body_limit(mut self, limit: Option<u64>) -> Self {
        self.config.body_limit = limit;
        self
    }

    /// Creates the client.
    pub fn build(self) -> Result<HttpClient> {
        let config = self.config;
        let redirect = match config.redirect_limit {
            0 => Policy::none(),
            limit => Policy::limited(limit),
        };
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(redirect)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(HttpClient {
            shared: Arc::new(Shared { client, config }),
        })
    }
}

struct Shared {
    client: reqwest::Client,
    config: HttpClientConfig,
}

/// A GET-only HTTP client for remote report resources.
///
/// Clones share one connection pool. Requests run on a Tokio runtime.
///
/// ```ignore
/// let client = HttpClient::builder()
///     .request_timeout(Duration::from_secs(5))
///     .build()?;
/// let logo = client.fetch("https://cdn.example.com/logo.png", "image/*").await?;
/// ```
#[derive(Clone)]
pub struct HttpClient {
    shared: Arc<Shared>,
}

impl HttpClient {
    /// Returns a builder with the default limits.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Returns the limits the client was built with.
    pub fn config(&self) -> &HttpClientConfig {
        &self.shared.config
    }

    /// Starts a GET request for `url`.
    pub fn get(&self, url: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(self.clone(), url.into())
    }

    /// Fetches the body of `url`, accepting the media range `accept`.
    ///
    /// Non-success statuses become [`NetworkError::Status`](crate::NetworkError::Status).
    pub async fn fetch(&self, url: impl Into<String>, accept: &str) -> Result<Bytes> {
        let response = self.get(url).header("accept", accept).send().await?;
        let body = response.error_for_status()?.bytes().await?;
        tracing::debug!(
            target: "horizon_tabular_net::http",
            bytes = body.len(),
            "fetched resource"
        );
        Ok(body)
    }

    pub(crate) fn reqwest(&self) -> &reqwest::Client {
        &self.shared.client
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HttpClient")
            .field(&self.shared.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let client = HttpClient::builder()
            .request_timeout(Duration::from_secs(3))
            .redirect_limit(0)
            .body_limit(None)
            .build()
            .unwrap();
        let config = client.config();
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(config.redirect_limit, 0);
        assert_eq!(config.body_limit, None);
        assert!(config.user_agent.starts_with("horizon-tabular/"));
    }
}
