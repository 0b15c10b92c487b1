// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Method;

use super::headers::{AUTHORIZATION, COOKIE, PROXY_AUTHORIZATION};
use super::normalize::normalize;
use super::options::Options;
use super::request::Request;
use super::response::Response;
use super::transport::{ReqwestTransport, Transport};
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Timeout for establishing connections
    pub connect_timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
    /// Transparently decompress gzip and brotli bodies
    pub decompress: bool,
    /// Options every request starts from
    pub defaults: Options,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 10,
            accept_invalid_certs: false,
            decompress: true,
            defaults: Options::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new client config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set max redirects
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Accept invalid TLS certificates
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Enable/disable body decompression
    pub fn decompress(mut self, decompress: bool) -> Self {
        self.decompress = decompress;
        self
    }

    /// Set default options
    pub fn defaults(mut self, defaults: Options) -> Self {
        self.defaults = defaults;
        self
    }
}

/// Options-based HTTP client
///
/// Cheap to clone. The default options are fixed at construction and merged
/// under the options of every call.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    defaults: Arc<Options>,
}

impl Client {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client whose requests start from `defaults`
    pub fn with_options(defaults: Options) -> Result<Self> {
        Self::with_config(ClientConfig::default().defaults(defaults))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(transport, config.defaults))
    }

    /// Create a client over a custom transport
    pub fn with_transport(transport: impl Transport + 'static, defaults: Options) -> Self {
        Self {
            transport: Arc::new(transport),
            defaults: Arc::new(defaults),
        }
    }

    /// Default options
    pub fn defaults(&self) -> &Options {
        &self.defaults
    }

    /// Execute a GET request
    pub async fn get(&self, uri: &str, options: impl Into<Option<Options>>) -> Result<Response> {
        self.request(Method::GET, uri, options).await
    }

    /// Execute a POST request
    pub async fn post(&self, uri: &str, options: impl Into<Option<Options>>) -> Result<Response> {
        self.request(Method::POST, uri, options).await
    }

    /// Execute a PUT request
    pub async fn put(&self, uri: &str, options: impl Into<Option<Options>>) -> Result<Response> {
        self.request(Method::PUT, uri, options).await
    }

    /// Execute a PATCH request
    pub async fn patch(&self, uri: &str, options: impl Into<Option<Options>>) -> Result<Response> {
        self.request(Method::PATCH, uri, options).await
    }

    /// Execute a DELETE request
    pub async fn delete(&self, uri: &str, options: impl Into<Option<Options>>) -> Result<Response> {
        self.request(Method::DELETE, uri, options).await
    }

    /// Execute a HEAD request
    pub async fn head(&self, uri: &str, options: impl Into<Option<Options>>) -> Result<Response> {
        self.request(Method::HEAD, uri, options).await
    }

    /// Execute an OPTIONS request
    pub async fn options(
        &self,
        uri: &str,
        options: impl Into<Option<Options>>,
    ) -> Result<Response> {
        self.request(Method::OPTIONS, uri, options).await
    }

    /// Execute a request with an arbitrary method
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        options: impl Into<Option<Options>>,
    ) -> Result<Response> {
        let request = self.build(method, uri, options)?;
        self.execute(request).await
    }

    /// Resolve a request without sending it
    pub fn build(
        &self,
        method: Method,
        uri: &str,
        options: impl Into<Option<Options>>,
    ) -> Result<Request> {
        let options = options.into().unwrap_or_default().merge(&self.defaults);
        normalize(method, uri, &options)
    }

    /// Send an already resolved request
    pub async fn execute(&self, request: Request) -> Result<Response> {
        if request.debug {
            dump(&request);
        }
        tracing::debug!(method = %request.method, url = %request.url, "Dispatching request");

        let start = Instant::now();
        let dispatch = self.transport.execute(&request);
        let raw = match request.timeout {
            Some(timeout) => tokio::time::timeout(timeout, dispatch)
                .await
                .map_err(|_| {
                    Error::transport(
                        &request.method,
                        &request.url,
                        std::io::Error::new(std::io::ErrorKind::TimedOut, "deadline elapsed"),
                    )
                })??,
            None => dispatch.await?,
        };

        tracing::debug!(
            url = %request.url,
            status = %raw.status,
            time_ms = start.elapsed().as_millis() as u64,
            "Response"
        );

        Ok(Response::new(request, raw))
    }
}

const REDACTED: &str = "[redacted]";

/// Headers whose values never appear in dumps
fn is_sensitive(name: &str) -> bool {
    [AUTHORIZATION, COOKIE, PROXY_AUTHORIZATION]
        .iter()
        .any(|sensitive| name.eq_ignore_ascii_case(sensitive))
}

fn dump(request: &Request) {
    tracing::info!(
        method = %request.method,
        url = %request.url,
        body_len = request.body_len(),
        "Request"
    );
    for (name, value) in request.headers.iter() {
        if is_sensitive(name.as_str()) {
            tracing::info!(header = %name, value = REDACTED, "Request header");
        } else {
            tracing::info!(header = %name, value = ?value, "Request header");
        }
    }
    if request.body.is_some() {
        tracing::debug!(body = %request.body_text_lossy(), "Request body");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Params;

    #[test]
    fn test_client_creation() {
        let client = Client::new().unwrap();
        assert!(client.defaults().headers.is_empty());
    }

    #[test]
    fn test_build_merges_defaults() {
        let client = Client::with_options(
            Options::new()
                .base_uri("http://127.0.0.1:8091/")
                .header("User-Agent", "testing/1.0"),
        )
        .unwrap();

        let req = client
            .build(
                Method::GET,
                "get-with-query",
                Options::new().query(Params::new().with("key1", "value1")),
            )
            .unwrap();

        assert_eq!(req.url_str(), "http://127.0.0.1:8091/get-with-query?key1=value1");
        assert_eq!(req.header("user-agent"), Some("testing/1.0"));
    }

    #[test]
    fn test_build_default_header_overridden_in_any_case() {
        let client =
            Client::with_options(Options::new().header("User-Agent", "default/1.0")).unwrap();
        let req = client
            .build(
                Method::GET,
                "http://127.0.0.1:8091/get",
                Options::new().header("user-agent", "mine/2.0"),
            )
            .unwrap();
        assert_eq!(req.header_all("user-agent"), vec!["mine/2.0"]);
    }

    #[test]
    fn test_sensitive_headers() {
        assert!(is_sensitive("Authorization"));
        assert!(is_sensitive("cookie"));
        assert!(is_sensitive("Proxy-Authorization"));
        assert!(!is_sensitive("accept"));
        assert!(!is_sensitive("x-cookie-hint"));
    }

    #[test]
    fn test_build_without_options() {
        let client = Client::new().unwrap();
        let req = client.build(Method::POST, "http://127.0.0.1:8091/post", None).unwrap();
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn test_invalid_proxy_fails_before_dispatch() {
        let client = Client::new().unwrap();
        let result = client.build(
            Method::GET,
            "http://127.0.0.1:8091/get",
            Options::new().proxy("::not-a-proxy"),
        );
        assert!(matches!(result, Err(Error::ProxyConfig { .. })));
    }
}
