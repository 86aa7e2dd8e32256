//! Response with a size-limited body.

use bytes::{Bytes, BytesMut};

use crate::error::{NetworkError, Result};

/// A response whose body has not been read yet.
pub struct HttpResponse {
    inner: reqwest::Response,
    body_limit: Option<u64>,
}

impl HttpResponse {
    pub(crate) fn new(inner: reqwest::Response, body_limit: Option<u64>) -> Self {
        Self { inner, body_limit }
    }

    /// Status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// Returns a header value if present and valid text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)?.to_str().ok()
    }

    /// The `Content-Type` header.
    pub fn content_type(&self) -> Option<&str> {
        self.header(http::header::CONTENT_TYPE.as_str())
    }

    /// URL of the final response after redirects.
    pub fn url(&self) -> &str {
        self.inner.url().as_str()
    }

    /// Turns a non-success status into [`NetworkError::Status`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(NetworkError::Status(self.status()))
        }
    }

    /// Reads the body.
    ///
    /// Stops with [`NetworkError::BodyTooLarge`] as soon as the body is known
    /// to exceed the client's body limit.
    pub async fn bytes(self) -> Result<Bytes> {
        let Self {
            mut inner,
            body_limit,
        } = self;
        let Some(limit) = body_limit else {
            return Ok(inner.bytes().await?);
        };

        let too_large = NetworkError::BodyTooLarge { limit };
        let declared = inner.content_length().unwrap_or(0);
        if declared > limit {
            return Err(too_large);
        }

        let mut body = BytesMut::with_capacity(declared as usize);
        while let Some(chunk) = inner.chunk().await? {
            if (body.len() + chunk.len()) as u64 > limit {
                return Err(too_large);
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HttpResponse({} {})", self.status(), self.url())
    }
}
