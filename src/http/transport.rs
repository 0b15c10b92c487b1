// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport seam
//!
//! [`Transport`] performs one fully formed [`Request`]. The default
//! implementation is [`ReqwestTransport`]; tests and embedders can inject
//! their own through [`Client::with_transport`](super::Client::with_transport).

use std::collections::HashMap;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use parking_lot::RwLock;
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use url::Url;

use super::client::ClientConfig;
use super::request::Request;
use crate::error::{BoxError, Error, Result};

/// Response body as a stream of chunks
pub type BodyStream = Pin<Box<dyn Stream<Item = std::result::Result<Bytes, BoxError>> + Send>>;

/// What a transport hands back once response headers are in
pub struct TransportResponse {
    /// Response status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Final URL (after redirects)
    pub url: Url,
    /// Unread body
    pub body: BodyStream,
}

impl TransportResponse {
    /// Response with an already buffered body
    pub fn from_bytes(status: StatusCode, headers: HeaderMap, url: Url, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        Self {
            status,
            headers,
            url,
            body: Box::pin(futures::stream::once(async move { Ok::<_, BoxError>(body) })),
        }
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("url", &self.url.as_str())
            .finish()
    }
}

/// Performs a single request
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return once response headers are available.
    ///
    /// Implementations honor `request.proxy` and should honor
    /// `request.timeout`; the client enforces the deadline as well.
    async fn execute(&self, request: &Request) -> Result<TransportResponse>;
}

/// reqwest-backed transport
///
/// Requests without a proxy share one connection pool. Each distinct proxy
/// gets its own client, built on first use and kept for later calls.
pub struct ReqwestTransport {
    client: reqwest::Client,
    config: ClientConfig,
    proxied: RwLock<HashMap<Url, reqwest::Client>>,
}

impl ReqwestTransport {
    /// Create a transport from client configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Self::builder(config)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            proxied: RwLock::new(HashMap::new()),
        })
    }

    fn builder(config: &ClientConfig) -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.connect_timeout)
            .redirect(Policy::limited(config.max_redirects))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .gzip(config.decompress)
            .brotli(config.decompress)
    }

    /// Client to dispatch through, honoring the proxy
    fn client_for(&self, proxy: Option<&Url>) -> Result<reqwest::Client> {
        let Some(proxy) = proxy else {
            return Ok(self.client.clone());
        };

        if let Some(client) = self.proxied.read().get(proxy) {
            return Ok(client.clone());
        }

        let client = Self::builder(&self.config)
            .proxy(reqwest::Proxy::all(proxy.as_str()).map_err(|e| Error::proxy(proxy.as_str(), e))?)
            .build()
            .map_err(|e| Error::proxy(proxy.as_str(), e))?;

        self.proxied.write().insert(proxy.clone(), client.clone());
        Ok(client)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &Request) -> Result<TransportResponse> {
        let client = self.client_for(request.proxy.as_ref())?;

        let mut builder = client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());

        if let Some(ref body) = request.body {
            builder = builder.body(body.clone());
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::transport(&request.method, &request.url, e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let body = response
            .bytes_stream()
            .map_err(|e| -> BoxError { Box::new(e) });

        Ok(TransportResponse {
            status,
            headers,
            url,
            body: Box::pin(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_proxy_clients_are_reused() {
        let transport = ReqwestTransport::new(&ClientConfig::default()).unwrap();
        let proxy = Url::parse("http://127.0.0.1:1087").unwrap();

        transport.client_for(Some(&proxy)).unwrap();
        transport.client_for(Some(&proxy)).unwrap();
        transport.client_for(None).unwrap();

        assert_eq!(transport.proxied.read().len(), 1);
    }

    #[tokio::test]
    async fn test_buffered_response_stream() {
        let mut raw = TransportResponse::from_bytes(
            StatusCode::OK,
            HeaderMap::new(),
            Url::parse("http://example.com").unwrap(),
            "hello",
        );
        let chunk = raw.body.next().await.unwrap().unwrap();
        assert_eq!(&chunk[..], b"hello");
        assert!(raw.body.next().await.is_none());
    }
}
