//! GET-only HTTP for remote report resources such as header images.
//!
//! Requests are async and run on a Tokio runtime. Every client carries
//! [`HttpClientConfig`] limits: request and connect timeouts, a redirect
//! limit and a body size limit.
//!
//! ```ignore
//! use horizon_tabular_net::http::HttpClient;
//!
//! let client = HttpClient::builder()
//!     .request_timeout(Duration::from_secs(5))
//!     .body_limit(Some(2 * 1024 * 1024))
//!     .build()?;
//!
//! let response = client
//!     .get("https://cdn.example.com/logo.png")
//!     .header("accept", "image/*")
//!     .send()
//!     .await?;
//! let bytes = response.error_for_status()?.bytes().await?;
//! ```

mod client;
mod request;
mod response;

pub use client::{
    DEFAULT_BODY_LIMIT, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REDIRECT_LIMIT, DEFAULT_REQUEST_TIMEOUT,
    HttpClient, HttpClientBuilder, HttpClientConfig,
};
pub use request::HttpRequestBuilder;
pub use response::HttpResponse;
