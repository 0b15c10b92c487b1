// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # haavi - Options-based HTTP client
//!
//! A thin layer over reqwest. Every verb takes a target and an optional
//! [`Options`] bag; the bag is normalized into a concrete request and the
//! response comes back wrapped with typed accessors.
//!
//! ## Features
//!
//! - Query as a raw string or a mapping, list values repeat the key
//! - Multi-value headers sent as separate header lines
//! - Urlencoded form bodies and JSON bodies
//! - Cookies, per-request timeout and proxy
//! - Client-wide default options merged under each call
//! - Lazily read, cached response body
//!
//! ## Example
//!
//! ```rust,no_run
//! use haavi::{Client, Options, Params};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new()?;
//!
//!     let resp = client
//!         .get(
//!             "http://127.0.0.1:8091/get-with-query",
//!             Options::new().query(
//!                 Params::new()
//!                     .with("key1", "value1")
//!                     .with("key2", ["value21", "value22"]),
//!             ),
//!         )
//!         .await?;
//!
//!     println!("{}", resp.request().url.query().unwrap_or_default());
//!     println!("{} {}", resp.status_code(), resp.text().await?);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;

// Errors
pub use error::{BoxError, Error, Result};

// HTTP
pub use http::{
    Client, ClientConfig, Cookies, Encoded, Options, ParamValue, Params, Request, Response,
    Transport, TransportResponse,
};

/// haavi version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
