// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client layer
//!
//! Turns per-request [`Options`] into a normalized [`Request`], sends it
//! through a [`Transport`] and wraps the result in a [`Response`].

mod client;
mod normalize;
mod options;
mod request;
mod response;
mod transport;

pub use client::{Client, ClientConfig};
pub use normalize::{normalize, resolve_body, resolve_headers, resolve_proxy, resolve_url};
pub use options::{Cookies, Encoded, Options, ParamValue, Params};
pub use request::Request;
pub use response::Response;
pub use transport::{BodyStream, ReqwestTransport, Transport, TransportResponse};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("haavi/", env!("CARGO_PKG_VERSION"));

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const USER_AGENT: &str = "user-agent";
    pub const AUTHORIZATION: &str = "authorization";
    pub const PROXY_AUTHORIZATION: &str = "proxy-authorization";
}

/// Content types callers commonly pair with body options
pub mod mime {
    pub const JSON: &str = "application/json";
    pub const FORM: &str = "application/x-www-form-urlencoded";
}
