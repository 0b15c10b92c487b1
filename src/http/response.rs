// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response wrapper

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use url::Url;

use super::request::Request;
use super::transport::{BodyStream, TransportResponse};
use crate::error::{Error, Result};

enum BodyState {
    Pending(BodyStream),
    Ready(Bytes),
    Failed(String),
}

/// Response to a dispatched [`Request`]
///
/// Status and headers are available immediately. The body is read from the
/// transport on the first call to [`body`](Response::body) and cached; a
/// failed read is cached as well.
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    request: Request,
    body: Mutex<BodyState>,
}

impl Response {
    /// Wrap a raw transport response together with the request behind it
    pub fn new(request: Request, raw: TransportResponse) -> Self {
        Self {
            status: raw.status,
            headers: raw.headers,
            url: raw.url,
            request,
            body: Mutex::new(BodyState::Pending(raw.body)),
        }
    }

    /// The outgoing request that produced this response
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Canonical reason phrase, empty for unknown codes
    pub fn reason_phrase(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Check if status is client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Check if status is server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get all values for a header
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// All values of a header joined with `, `
    pub fn header_line(&self, name: &str) -> String {
        self.header_all(name).join(", ")
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Final URL (after redirects)
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Read the full body. Later calls return the cached bytes.
    pub async fn body(&self) -> Result<Bytes> {
        let mut state = self.body.lock().await;

        if let BodyState::Pending(stream) = &mut *state {
            *state = match read_to_end(stream).await {
                Ok(bytes) => BodyState::Ready(bytes),
                Err(reason) => BodyState::Failed(reason),
            };
        }

        match &*state {
            BodyState::Ready(bytes) => Ok(bytes.clone()),
            BodyState::Failed(reason) => Err(Error::body_read(reason)),
            BodyState::Pending(_) => Err(Error::body_read("body was not read")),
        }
    }

    /// Get body as text, lossy conversion
    pub async fn text(&self) -> Result<String> {
        let body = self.body().await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Parse body as JSON
    pub async fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let body = self.body().await?;
        serde_json::from_slice(&body).map_err(Error::Decode)
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("url", &self.url.as_str())
            .field("request", &self.request)
            .finish()
    }
}

async fn read_to_end(stream: &mut BodyStream) -> std::result::Result<Bytes, String> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| e.to_string())?;
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}
