// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-request options
//!
//! [`Options`] is the bag of settings a caller hands to every verb on
//! [`Client`](super::Client). Values that may be given once or several times
//! under the same key are modeled as [`ParamValue`], and inputs that may arrive
//! either pre-encoded or as a mapping are modeled as [`Encoded`].

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::{Error, Result};

/// A single value or an ordered list of values under one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Scalar(String),
    List(Vec<String>),
}

impl ParamValue {
    /// All values in emission order
    pub fn values(&self) -> &[String] {
        match self {
            ParamValue::Scalar(v) => std::slice::from_ref(v),
            ParamValue::List(vs) => vs,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Scalar(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Scalar(v)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(vs: Vec<String>) -> Self {
        ParamValue::List(vs)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(vs: Vec<&str>) -> Self {
        ParamValue::List(vs.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ParamValue {
    fn from(vs: [&str; N]) -> Self {
        ParamValue::List(vs.iter().map(|v| v.to_string()).collect())
    }
}

/// Render a JSON scalar the way it would appear in a query string
fn json_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl TryFrom<Value> for ParamValue {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        if let Some(scalar) = json_scalar(&value) {
            return Ok(ParamValue::Scalar(scalar));
        }
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    json_scalar(item).ok_or_else(|| {
                        Error::malformed(format!("list element {} is not a scalar", item))
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(ParamValue::List),
            other => Err(Error::malformed(format!(
                "expected a scalar or a list of scalars, got {}",
                other
            ))),
        }
    }
}

/// Key to value(s) mapping, iterated in key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a key, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get the value(s) under a key
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Flatten into `(key, value)` pairs, one per list element
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(key, value)| {
            value
                .values()
                .iter()
                .map(move |v| (key.as_str(), v.as_str()))
        })
    }

    /// Encode as `application/x-www-form-urlencoded`
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// Union with `other`; keys already present here win
    fn union(mut self, other: &Params) -> Params {
        for (key, value) in other.iter() {
            self.0.entry(key.clone()).or_insert_with(|| value.clone());
        }
        self
    }

    /// Union for header names, which compare case-insensitively
    fn union_ignore_case(mut self, other: &Params) -> Params {
        for (key, value) in other.iter() {
            if !self.0.keys().any(|own| own.eq_ignore_ascii_case(key)) {
                self.0.insert(key.clone(), value.clone());
            }
        }
        self
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl TryFrom<Value> for Params {
    type Error = Error;

    /// Accept a loosely typed JSON object. Nested objects, nested lists and
    /// nulls are rejected.
    fn try_from(value: Value) -> Result<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::malformed(format!("expected an object, got {}", other)));
            }
        };
        let mut params = Params::new();
        for (key, value) in map {
            let value = ParamValue::try_from(value)
                .map_err(|e| Error::malformed(format!("key '{}': {}", key, e)))?;
            params.0.insert(key, value);
        }
        Ok(params)
    }
}

/// Either a pre-encoded string passed through untouched, or a mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    Raw(String),
    Params(Params),
}

impl Encoded {
    /// Encoded form, ready to append to a URL or write as a body
    pub fn encode(&self) -> String {
        match self {
            Encoded::Raw(raw) => raw.clone(),
            Encoded::Params(params) => params.encode(),
        }
    }

    fn merge(over: Option<Encoded>, under: &Option<Encoded>) -> Option<Encoded> {
        match (over, under) {
            (Some(Encoded::Params(a)), Some(Encoded::Params(b))) => {
                Some(Encoded::Params(a.union(b)))
            }
            (Some(over), _) => Some(over),
            (None, under) => under.clone(),
        }
    }
}

impl From<&str> for Encoded {
    fn from(raw: &str) -> Self {
        Encoded::Raw(raw.to_string())
    }
}

impl From<String> for Encoded {
    fn from(raw: String) -> Self {
        Encoded::Raw(raw)
    }
}

impl From<Params> for Encoded {
    fn from(params: Params) -> Self {
        Encoded::Params(params)
    }
}

/// Cookies sent with the request as one `Cookie` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cookies {
    Raw(String),
    Pairs(BTreeMap<String, String>),
}

impl Cookies {
    /// Value for the `Cookie` header
    pub fn header_value(&self) -> String {
        match self {
            Cookies::Raw(raw) => raw.clone(),
            Cookies::Pairs(pairs) => pairs
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }

    fn merge(over: Option<Cookies>, under: &Option<Cookies>) -> Option<Cookies> {
        match (over, under) {
            (Some(Cookies::Pairs(mut a)), Some(Cookies::Pairs(b))) => {
                for (name, value) in b {
                    a.entry(name.clone()).or_insert_with(|| value.clone());
                }
                Some(Cookies::Pairs(a))
            }
            (Some(over), _) => Some(over),
            (None, under) => under.clone(),
        }
    }
}

impl From<&str> for Cookies {
    fn from(raw: &str) -> Self {
        Cookies::Raw(raw.to_string())
    }
}

impl From<String> for Cookies {
    fn from(raw: String) -> Self {
        Cookies::Raw(raw)
    }
}

impl From<BTreeMap<String, String>> for Cookies {
    fn from(pairs: BTreeMap<String, String>) -> Self {
        Cookies::Pairs(pairs)
    }
}

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Base URI that relative targets are joined onto
    pub base_uri: Option<String>,
    /// Query string appended to the target URL
    pub query: Option<Encoded>,
    /// Request headers; list values become repeated header lines
    pub headers: Params,
    /// Cookies for the `Cookie` header
    pub cookies: Option<Cookies>,
    /// Urlencoded body
    pub form_params: Option<Encoded>,
    /// JSON body, takes precedence over `form_params`
    pub json: Option<Value>,
    /// Deadline for the whole transport call
    pub timeout: Option<Duration>,
    /// Proxy URL, e.g. `http://127.0.0.1:1087`
    pub proxy: Option<String>,
    /// Dump outgoing requests at info level
    pub debug: bool,
}

impl Options {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URI
    pub fn base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    /// Set query, either a raw string or [`Params`]
    pub fn query(mut self, query: impl Into<Encoded>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Set one header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replace all headers
    pub fn headers(mut self, headers: Params) -> Self {
        self.headers = headers;
        self
    }

    /// Add one cookie
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut pairs = match self.cookies.take() {
            Some(Cookies::Pairs(pairs)) => pairs,
            _ => BTreeMap::new(),
        };
        pairs.insert(name.into(), value.into());
        self.cookies = Some(Cookies::Pairs(pairs));
        self
    }

    /// Replace all cookies
    pub fn cookies(mut self, cookies: impl Into<Cookies>) -> Self {
        self.cookies = Some(cookies.into());
        self
    }

    /// Set urlencoded body, either a raw string or [`Params`]
    pub fn form_params(mut self, form: impl Into<Encoded>) -> Self {
        self.form_params = Some(form.into());
        self
    }

    /// Set JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self> {
        self.json = Some(serde_json::to_value(data)?);
        Ok(self)
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set timeout in fractional seconds.
    ///
    /// Negative and NaN values mean zero. Values too large for a
    /// [`Duration`], infinity included, saturate to `Duration::MAX`.
    pub fn timeout_secs(self, secs: f64) -> Self {
        let timeout = Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX);
        self.timeout(timeout)
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Enable request dumps
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Layer these options over `defaults`.
    ///
    /// Scalar fields set here win. Header, query, form and cookie mappings are
    /// unioned with keys from `self` winning; a raw string on either side
    /// replaces rather than merges. The body is taken as a unit: if `self`
    /// sets `json` or `form_params`, none of the default body survives.
    pub fn merge(self, defaults: &Options) -> Options {
        let own_body = self.json.is_some() || self.form_params.is_some();
        let (json, form_params) = if own_body {
            (self.json, self.form_params)
        } else {
            (defaults.json.clone(), defaults.form_params.clone())
        };

        Options {
            base_uri: self.base_uri.or_else(|| defaults.base_uri.clone()),
            query: Encoded::merge(self.query, &defaults.query),
            headers: self.headers.union_ignore_case(&defaults.headers),
            cookies: Cookies::merge(self.cookies, &defaults.cookies),
            form_params,
            json,
            timeout: self.timeout.or(defaults.timeout),
            proxy: self.proxy.or_else(|| defaults.proxy.clone()),
            debug: self.debug || defaults.debug,
        }
    }
}
