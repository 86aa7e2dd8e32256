//! GET request builder.

use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue};

use super::client::HttpClient;
use super::response::HttpResponse;
use crate::error::Result;

/// A GET request being put together.
///
/// Header errors are held until [`send`](Self::send) so calls can be chained.
pub struct HttpRequestBuilder {
    client: HttpClient,
    url: String,
    headers: Result<HeaderMap>,
    timeout: Option<Duration>,
}

impl HttpRequestBuilder {
    pub(crate) fn new(client: HttpClient, url: String) -> Self {
        Self {
            client,
            url,
            headers: Ok(HeaderMap::new()),
            timeout: None,
        }
    }

    /// Adds a header, replacing an earlier one of the same name.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers = self.headers.and_then(|mut headers| {
            let name = HeaderName::from_bytes(name.as_bytes())?;
            let value = HeaderValue::from_str(value)?;
            headers.insert(name, value);
            Ok(headers)
        });
        self
    }

    /// Overrides the client's request timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sends the request and waits for the status line and headers.
    pub async fn send(self) -> Result<HttpResponse> {
        let url = url::Url::parse(&self.url)?;
        let headers = self.headers?;

        let mut request = self.client.reqwest().get(url).headers(headers);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!(target: "horizon_tabular_net::http", url = %self.url, "GET");
        let response = request.send().await?;
        Ok(HttpResponse::new(response, self.client.config().body_limit))
    }
}

impl std::fmt::Debug for HttpRequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequestBuilder")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
