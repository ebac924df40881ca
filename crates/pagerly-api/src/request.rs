// Request builder
//
// Turns a method, a relative path and a heterogeneous parameter bag into a
// fully specified `ApiRequest`. No I/O happens here; the transport executes
// whatever this module produces.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::SecretString;
use serde_json::{Map, Value};
use url::Url;

use crate::auth;
use crate::error::Error;

/// Versioned media type the API expects in `Accept`.
pub const CONTENT_TYPE_V2: &str = "application/vnd.pagerduty+json;version=2";

// ── Entity references ───────────────────────────────────────────────

/// A parameter value that points at another entity.
///
/// Either a bare identifier or the snapshot of a materialized entity; both are
/// reduced to an `id` when the request is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    Id(String),
    Entity(Arc<Map<String, Value>>),
}

impl Reference {
    pub fn id(&self) -> Result<&str, Error> {
        match self {
            Self::Id(id) => Ok(id),
            Self::Entity(data) => data
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::invalid_arguments("entity reference has no 'id'")),
        }
    }
}

impl From<&str> for Reference {
    fn from(id: &str) -> Self {
        Self::Id(id.to_owned())
    }
}

impl From<String> for Reference {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

// ── Query values ────────────────────────────────────────────────────

/// One query-parameter value before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(DateTime<Utc>),
    Ref(Reference),
    List(Vec<QueryValue>),
}

impl QueryValue {
    /// Empty strings and empty lists count as "no value" for query aliasing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Str(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }

    fn render_scalar(&self, key: &str) -> Result<String, Error> {
        match self {
            Self::Str(s) => Ok(s.clone()),
            Self::Int(n) => Ok(n.to_string()),
            Self::Float(f) => Ok(f.to_string()),
            Self::Bool(b) => Ok(b.to_string()),
            Self::DateTime(dt) => Ok(dt.to_rfc3339()),
            Self::Ref(reference) => reference.id().map(str::to_owned),
            Self::List(_) => Err(Error::invalid_arguments(format!(
                "nested sequence in query parameter '{key}'"
            ))),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for QueryValue {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u64> for QueryValue {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or_else(|_| Self::Str(n.to_string()), Self::Int)
    }
}

impl From<f64> for QueryValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<DateTime<Utc>> for QueryValue {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }
}

impl From<Reference> for QueryValue {
    fn from(reference: Reference) -> Self {
        Self::Ref(reference)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<QueryValue> + Clone> From<&[T]> for QueryValue {
    fn from(items: &[T]) -> Self {
        Self::List(items.iter().cloned().map(Into::into).collect())
    }
}

// ── Parameter bag ───────────────────────────────────────────────────

/// Query parameters keyed by name.
///
/// Backed by a `BTreeMap` so the rendered query string does not depend on
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, QueryValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &QueryValue)> {
        self.0.iter()
    }

    /// Render into `(key, value)` pairs ready for the query string.
    ///
    /// Sequences become repeated `key[]` pairs and entity references are
    /// reduced to their `id`. `self` is left untouched.
    pub fn normalize(&self) -> Result<Vec<(String, String)>, Error> {
        let mut pairs = Vec::with_capacity(self.0.len());
        for (key, value) in &self.0 {
            match value {
                QueryValue::List(items) => {
                    let array_key = format!("{key}[]");
                    for item in items {
                        pairs.push((array_key.clone(), item.render_scalar(key)?));
                    }
                }
                scalar => pairs.push((key.clone(), scalar.render_scalar(key)?)),
            }
        }
        Ok(pairs)
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ── Request description ─────────────────────────────────────────────

/// Per-call inputs besides method and path.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Params,
    pub body: Option<Value>,
    /// Merged over the default headers; later entries win.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: Params) -> Self {
        self.query = query;
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A fully specified HTTP request, ready for a [`Transport`](crate::Transport).
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Join `path` onto `base` with a single `/`.
pub fn join_url(base: &Url, path: &str) -> Result<Url, Error> {
    let base = base.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return Ok(Url::parse(base)?);
    }
    Ok(Url::parse(&format!("{base}/{path}"))?)
}

/// Default headers: versioned `Accept`, JSON `Content-Type`, token auth.
pub fn default_headers(api_key: &SecretString) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(CONTENT_TYPE_V2));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(AUTHORIZATION, auth::authorization_header(api_key)?);
    Ok(headers)
}

/// Assemble an [`ApiRequest`].
pub fn build_request(
    method: Method,
    base_url: &Url,
    path: &str,
    api_key: &SecretString,
    options: &RequestOptions,
) -> Result<ApiRequest, Error> {
    let mut headers = default_headers(api_key)?;

    for (name, value) in &options.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::InvalidHeaders {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| Error::InvalidHeaders {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(ApiRequest {
        method,
        url: join_url(base_url, path)?,
        headers,
        query: options.query.normalize()?,
        body: options.body.clone(),
    })
}
