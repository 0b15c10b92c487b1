// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Options normalizer
//!
//! Flattens [`Options`] into a [`Request`]: final URL, header multimap, body
//! bytes and the proxy to route through. Pure computation, no I/O.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

use super::headers::COOKIE;
use super::options::{Cookies, Encoded, Options, Params};
use super::request::Request;
use crate::error::{Error, Result};

/// Proxy schemes reqwest knows how to route through
const PROXY_SCHEMES: &[&str] = &["http", "https", "socks5", "socks5h"];

/// Build the request described by `method`, `uri` and `options`
pub fn normalize(method: Method, uri: &str, options: &Options) -> Result<Request> {
    let url = resolve_url(uri, options.base_uri.as_deref(), options.query.as_ref())?;
    let headers = resolve_headers(&options.headers, options.cookies.as_ref())?;
    let body = resolve_body(options)?;
    let proxy = resolve_proxy(options.proxy.as_deref())?;

    Ok(Request {
        method,
        url,
        headers,
        body,
        timeout: options.timeout,
        proxy,
        debug: options.debug,
    })
}

/// Parse the target, join it onto `base_uri` when relative, then append the
/// query. An existing query is kept and the new one concatenated after `&`.
pub fn resolve_url(uri: &str, base_uri: Option<&str>, query: Option<&Encoded>) -> Result<Url> {
    let mut url = match (Url::parse(uri), base_uri) {
        (Ok(url), _) => url,
        (Err(url::ParseError::RelativeUrlWithoutBase), Some(base)) => Url::parse(base)
            .and_then(|base| base.join(uri))
            .map_err(|e| Error::invalid_url(uri, e))?,
        (Err(e), _) => return Err(Error::invalid_url(uri, e)),
    };

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_url(
            url.as_str(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::invalid_url(url.as_str(), "missing host"));
    }

    if let Some(query) = query {
        let encoded = query.encode();
        if !encoded.is_empty() {
            let merged = match url.query() {
                Some(existing) if !existing.is_empty() => format!("{}&{}", existing, encoded),
                _ => encoded,
            };
            url.set_query(Some(&merged));
        }
    }

    Ok(url)
}

/// One header line per value; list values are never comma-joined
pub fn resolve_headers(headers: &Params, cookies: Option<&Cookies>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();

    for (name, value) in headers.pairs() {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::malformed(format!("header name '{}': {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| Error::malformed(format!("header '{}' value: {}", name, e)))?;
        map.append(header_name, header_value);
    }

    if let Some(cookies) = cookies {
        let value = cookies.header_value();
        if !value.is_empty() {
            let value = HeaderValue::from_str(&value)
                .map_err(|e| Error::malformed(format!("cookie value: {}", e)))?;
            map.append(HeaderName::from_static(COOKIE), value);
        }
    }

    Ok(map)
}

/// JSON first, then form params, else no body. No content type is added.
pub fn resolve_body(options: &Options) -> Result<Option<Bytes>> {
    if let Some(ref json) = options.json {
        return Ok(Some(Bytes::from(serde_json::to_vec(json)?)));
    }
    Ok(options
        .form_params
        .as_ref()
        .map(|form| Bytes::from(form.encode())))
}

/// Validate the proxy URL before anything touches the network
pub fn resolve_proxy(proxy: Option<&str>) -> Result<Option<Url>> {
    let Some(raw) = proxy else {
        return Ok(None);
    };

    let url = Url::parse(raw).map_err(|e| Error::proxy(raw, e))?;
    if !PROXY_SCHEMES.contains(&url.scheme()) {
        return Err(Error::proxy(
            raw,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::proxy(raw, "missing host"));
    }
    Ok(Some(url))
}
