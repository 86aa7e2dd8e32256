//! Fetch errors.

use std::fmt;

/// Why a remote resource could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The URL did not parse or uses an unsupported scheme.
    InvalidUrl(String),
    /// A request header name or value was rejected.
    InvalidHeader(String),
    /// No response within the request timeout.
    Timeout,
    /// The server could not be reached.
    Connection(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The redirect limit was reached.
    Redirects,
    /// The body was larger than the client accepts.
    BodyTooLarge {
        /// Accepted size in bytes.
        limit: u64,
    },
    /// Any other transport failure.
    Transport(String),
}

impl NetworkError {
    /// Returns `true` when the same fetch could succeed later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Connection(_) => true,
            Self::Status(code) => *code == 429 || (500..600).contains(code),
            _ => false,
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(reason) => write!(f, "invalid URL: {reason}"),
            Self::InvalidHeader(reason) => write!(f, "invalid header: {reason}"),
            Self::Timeout => f.write_str("timed out"),
            Self::Connection(reason) => write!(f, "connection failed: {reason}"),
            Self::Status(code) => write!(f, "HTTP {code}"),
            Self::Redirects => f.write_str("redirect limit reached"),
            Self::BodyTooLarge { limit } => write!(f, "body exceeds {limit} bytes"),
            Self::Transport(reason) => write!(f, "transport error: {reason}"),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Status(status.as_u16());
        }
        match () {
            _ if err.is_timeout() => Self::Timeout,
            _ if err.is_connect() => Self::Connection(err.to_string()),
            _ if err.is_redirect() => Self::Redirects,
            _ if err.is_builder() => Self::InvalidUrl(err.to_string()),
            _ => Self::Transport(err.to_string()),
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<http::header::InvalidHeaderName> for NetworkError {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for NetworkError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

/// Result type for fetches.
pub type Result<T> = std::result::Result<T, NetworkError>;
