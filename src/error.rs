// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for haavi
//!
//! Every failure is returned to the immediate caller. Nothing is retried,
//! swallowed or logged inside the crate.

use thiserror::Error;

/// Result type alias for haavi operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error used for transport and body stream failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for haavi
#[derive(Error, Debug)]
pub enum Error {
    /// Option value has a shape the normalizer cannot flatten
    #[error("Malformed options: {0}")]
    MalformedOptions(String),

    /// JSON body could not be serialized
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Target URL is not a valid absolute URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Proxy URL is malformed or rejected by the transport
    #[error("Invalid proxy '{proxy}': {reason}")]
    ProxyConfig { proxy: String, reason: String },

    /// Network-level failure while dispatching
    #[error("Transport error for {method} {url}: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: BoxError,
    },

    /// Response stream failed after headers were received
    #[error("Failed to read response body: {0}")]
    BodyRead(String),

    /// Response body is not the expected JSON
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Client could not be built
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a malformed options error
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Error::MalformedOptions(msg.into())
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Error::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a proxy configuration error
    pub fn proxy(proxy: impl Into<String>, reason: impl ToString) -> Self {
        Error::ProxyConfig {
            proxy: proxy.into(),
            reason: reason.to_string(),
        }
    }

    /// Wrap a transport failure with the request it belongs to
    pub fn transport(
        method: impl ToString,
        url: impl ToString,
        source: impl Into<BoxError>,
    ) -> Self {
        Error::Transport {
            method: method.to_string(),
            url: url.to_string(),
            source: source.into(),
        }
    }

    /// Create a body read error
    pub fn body_read(reason: impl ToString) -> Self {
        Error::BodyRead(reason.to_string())
    }

    /// Check if the transport gave up because the deadline expired
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Transport { source, .. } => {
                if let Some(err) = source.downcast_ref::<reqwest::Error>() {
                    return err.is_timeout();
                }
                source
                    .downcast_ref::<std::io::Error>()
                    .map_or(false, |e| e.kind() == std::io::ErrorKind::TimedOut)
            }
            _ => false,
        }
    }

    /// Check if this is a network error
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    /// Check if the caller may reasonably retry
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::BodyRead(_))
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::InvalidUrl { url, .. } => Some(url),
            Error::Transport { url, .. } => Some(url),
            _ => None,
        }
    }
}
