//! Override mappings for the mocked request/response pair

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Fields merged into the default mock request.
///
/// Every field is optional. Keys that are not one of the known fields are
/// kept in `extra` and can be read back with
/// [`MockRequest::get`](super::MockRequest::get), which is how tests inject
/// data (a `user`, a tenant id, ...) that a server's context builder reads
/// off the request.
///
/// The method is not configurable: mock requests are always POST.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Request path, optionally with a query string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    pub headers: BTreeMap<String, String>,

    /// URL query parameters
    pub query: Map<String, Value>,

    pub cookies: BTreeMap<String, String>,

    /// Route parameters
    pub params: Map<String, Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from a JSON mapping.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_session(mut self, session: Value) -> Self {
        self.session = Some(session);
        self
    }

    /// Attach a free-form field to the request.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// Fields merged into the default mock response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    pub headers: BTreeMap<String, String>,

    /// Side-channel values servers may read or write while resolving options
    pub locals: Map<String, Value>,
}

impl ResponseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_local(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.locals.insert(name.into(), value.into());
        self
    }
}
