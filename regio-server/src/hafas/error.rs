//! transport.rest client error types.

use std::fmt;

/// Errors from talking to a transport.rest instance.
#[derive(Debug)]
pub enum HafasError {
    /// The request never produced a response (connect failure, timeout)
    Http(reqwest::Error),

    /// The response body was not the JSON shape we expect
    Json {
        message: String,
        body: Option<String>,
    },

    /// transport.rest answered with a non-success status. HAFAS errors are
    /// passed through as 5xx with a JSON message body.
    ApiError { status: u16, message: String },

    /// 404 for the given request path, typically an expired trip id
    NotFound { path: String },

    /// 429: the public instances throttle per client
    RateLimited,

    /// Configured base URL cannot be used to build request URLs
    InvalidBaseUrl(String),
}

impl HafasError {
    /// Whether the error came from a request that ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, HafasError::Http(e) if e.is_timeout())
    }
}

impl fmt::Display for HafasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HafasError::Http(e) => write!(f, "transport.rest request failed: {e}"),
            HafasError::Json { message, body } => {
                write!(f, "unexpected transport.rest response: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            HafasError::ApiError { status, message } => {
                write!(f, "transport.rest returned {status}: {message}")
            }
            HafasError::NotFound { path } => write!(f, "transport.rest has no {path}"),
            HafasError::RateLimited => write!(f, "rate limited by transport.rest (429)"),
            HafasError::InvalidBaseUrl(url) => write!(f, "invalid transport.rest base URL: {url}"),
        }
    }
}

impl std::error::Error for HafasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HafasError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HafasError {
    fn from(err: reqwest::Error) -> Self {
        HafasError::Http(err)
    }
}
