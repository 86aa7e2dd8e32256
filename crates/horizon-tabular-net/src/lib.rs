//! Networking for Horizon Tabular.
//!
//! The export pipeline uses this crate to fetch report header images from
//! HTTP(S) URLs:
//!
//! ```ignore
//! use horizon_tabular_net::HttpClient;
//!
//! let client = HttpClient::builder()
//!     .request_timeout(Duration::from_secs(10))
//!     .connect_timeout(Duration::from_secs(3))
//!     .redirect_limit(3)
//!     .user_agent("LedgerConsole/2.1")
//!     .build()?;
//! let logo = client.fetch("https://cdn.example.com/logo.png", "image/*").await?;
//! ```
//!
//! Failures are reported as [`NetworkError`], which tells timeouts,
//! unreachable hosts, invalid URLs and HTTP status errors apart.

mod error;
pub mod http;

pub use error::{NetworkError, Result};

pub use http::{HttpClient, HttpClientBuilder, HttpClientConfig, HttpRequestBuilder, HttpResponse};
