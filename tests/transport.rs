// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client behavior over injected transports

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};

use haavi::{BoxError, Client, Error, Options, Params, Request, Result, Transport, TransportResponse};

use common::init_tracing;

/// Records every request and answers 200 with a fixed body
#[derive(Clone, Default)]
struct Recorder {
    seen: Arc<Mutex<Vec<Request>>>,
}

#[async_trait]
impl Transport for Recorder {
    async fn execute(&self, request: &Request) -> Result<TransportResponse> {
        self.seen.lock().push(request.clone());
        Ok(TransportResponse::from_bytes(
            StatusCode::OK,
            HeaderMap::new(),
            request.url.clone(),
            "recorded",
        ))
    }
}

/// Never answers within any sane deadline
struct Stalled;

#[async_trait]
impl Transport for Stalled {
    async fn execute(&self, request: &Request) -> Result<TransportResponse> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(TransportResponse::from_bytes(
            StatusCode::OK,
            HeaderMap::new(),
            request.url.clone(),
            Bytes::new(),
        ))
    }
}

/// Sends headers, then drops the connection mid-body
struct Truncated;

#[async_trait]
impl Transport for Truncated {
    async fn execute(&self, request: &Request) -> Result<TransportResponse> {
        let chunks = futures::stream::iter(vec![
            Ok(Bytes::from("{\"partial\":")),
            Err(BoxError::from("connection closed before message completed")),
        ]);
        Ok(TransportResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            url: request.url.clone(),
            body: Box::pin(chunks),
        })
    }
}

#[test]
fn test_request_is_recorded_as_sent() {
    let recorder = Recorder::default();
    let client = Client::with_transport(recorder.clone(), Options::new().header("X-Client", "haavi"));

    let resp = tokio_test::block_on(client.request(
        Method::PATCH,
        "http://example.com/items?x=1",
        Options::new()
            .query(Params::new().with("y", ["2", "3"]))
            .header("X-Foo", ["Bar", "Baz"])
            .form_params("a=1&b=2")
            .proxy("http://127.0.0.1:1087")
            .debug(true),
    ))
    .unwrap();

    let seen = recorder.seen.lock();
    assert_eq!(seen.len(), 1);

    let sent = &seen[0];
    assert_eq!(sent.method, Method::PATCH);
    assert_eq!(sent.query(), Some("x=1&y=2&y=3"));
    assert_eq!(sent.header_all("x-foo"), vec!["Bar", "Baz"]);
    assert_eq!(sent.header("x-client"), Some("haavi"));
    assert_eq!(sent.body_text_lossy(), "a=1&b=2");
    assert_eq!(sent.proxy.as_ref().map(|p| p.as_str()), Some("http://127.0.0.1:1087/"));
    assert_eq!(resp.request().url, sent.url);
}

#[tokio::test]
async fn test_timeout_is_enforced_by_client() {
    init_tracing();
    let client = Client::with_transport(Stalled, Options::new());

    let err = client
        .get(
            "http://example.com/slow",
            Options::new().timeout(Duration::from_millis(50)),
        )
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.url(), Some("http://example.com/slow"));
}

#[tokio::test]
async fn test_default_timeout_applies() {
    let client = Client::with_transport(
        Stalled,
        Options::new().timeout(Duration::from_millis(50)),
    );
    let err = client.head("http://example.com/", None).await.unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_truncated_body() {
    init_tracing();
    let client = Client::with_transport(Truncated, Options::new());
    let resp = client.get("http://example.com/json", None).await.unwrap();

    assert_eq!(resp.status_code(), 200);
    let err = resp.json::<serde_json::Value>().await.unwrap_err();
    assert!(matches!(err, Error::BodyRead(_)));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_local_errors_skip_transport() {
    let recorder = Recorder::default();
    let client = Client::with_transport(recorder.clone(), Options::new());

    let bad_header = client
        .get("http://example.com", Options::new().header("bad header", "x"))
        .await;
    assert!(matches!(bad_header, Err(Error::MalformedOptions(_))));

    let bad_proxy = client
        .options("http://example.com", Options::new().proxy("socks9://nowhere"))
        .await;
    assert!(matches!(bad_proxy, Err(Error::ProxyConfig { .. })));

    let bad_url = client.get("relative/path", None).await;
    assert!(matches!(bad_url, Err(Error::InvalidUrl { .. })));

    assert!(recorder.seen.lock().is_empty());
}

#[tokio::test]
async fn test_client_is_shared_across_tasks() {
    let recorder = Recorder::default();
    let client = Client::with_transport(recorder.clone(), Options::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .get(
                        "http://example.com/n",
                        Options::new().query(Params::new().with("i", i.to_string())),
                    )
                    .await
                    .map(|resp| resp.status_code())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 200);
    }
    assert_eq!(recorder.seen.lock().len(), 8);
}
