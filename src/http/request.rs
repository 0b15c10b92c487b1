// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Normalized outgoing request

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::Method;
use std::time::Duration;
use url::Url;

/// A fully resolved HTTP request, as handed to the transport
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL with the final query string
    pub url: Url,
    /// Request headers, repeated names kept as separate lines
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Bytes>,
    /// Deadline for the transport call
    pub timeout: Option<Duration>,
    /// Proxy to route through
    pub proxy: Option<Url>,
    /// Dump this request when dispatching
    pub debug: bool,
}

impl Request {
    /// Create a bare request with no headers or body
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
            proxy: None,
            debug: false,
        }
    }

    /// Get the URL as string
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }

    /// Raw query string, if any
    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    /// First value of a header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Every value of a header, in the order they were added
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Body length in bytes
    pub fn body_len(&self) -> usize {
        self.body.as_ref().map_or(0, Bytes::len)
    }

    /// Body as text, lossy conversion
    pub fn body_text_lossy(&self) -> String {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }
}
