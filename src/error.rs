// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for hxclient
//!
//! Header collections never fail; everything that touches the network,
//! configuration or payload decoding reports through [`Error`].

use thiserror::Error;

/// Result type alias for hxclient operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for hxclient
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure reported by reqwest
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Server answered with a non-2xx status
    #[error("Http failure response for {url}: {status} {status_text}")]
    Status {
        status: u16,
        status_text: String,
        url: String,
        body: String,
    },

    /// JSONP request could not be performed or its script was malformed
    #[error("JSONP error: {0}")]
    Jsonp(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a status error
    pub fn status(
        status: u16,
        status_text: impl Into<String>,
        url: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Error::Status {
            status,
            status_text: status_text.into(),
            url: url.into(),
            body: body.into(),
        }
    }

    /// Create a JSONP error
    pub fn jsonp<S: Into<String>>(msg: S) -> Self {
        Error::Jsonp(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this is a status error
    pub fn is_status(&self) -> bool {
        matches!(self, Error::Status { .. })
    }

    /// Check if this is recoverable (can retry)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::Status { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }

    /// Get HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Status { url, .. } => Some(url),
            Error::Http(e) => e.url().map(|u| u.as_str()),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add operation context to error
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            match err {
                Error::Config(inner) => Error::Config(format!("{}: {}", msg, inner)),
                other => Error::Other(format!("{}: {}", msg, other)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error() {
        let err = Error::status(503, "Service Unavailable", "/api/items", "");

        assert!(err.is_status());
        assert!(err.is_recoverable());
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.url(), Some("/api/items"));
        assert_eq!(
            err.to_string(),
            "Http failure response for /api/items: 503 Service Unavailable"
        );
    }

    #[test]
    fn test_client_status_not_recoverable() {
        let err = Error::status(404, "Not Found", "/missing", "");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_message_conversions() {
        let err: Error = format!("step {} failed", 2).into();
        assert!(matches!(err, Error::Other(ref m) if m == "step 2 failed"));

        let err = Error::from("plain");
        assert_eq!(err.to_string(), "plain");
        assert!(!err.is_status());
        assert_eq!(err.status_code(), None);
        assert_eq!(err.url(), None);
    }

    #[test]
    fn test_context_keeps_config_kind() {
        let res: std::result::Result<(), Error> = Err(Error::config("bad"));
        let err = res.context("loading config").unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m == "loading config: bad"));

        let res: std::result::Result<(), &str> = Err("boom");
        let err = res.context("step").unwrap_err();
        assert_eq!(err.to_string(), "step: boom");
    }
}
