//! Mock HTTP request

use super::config::RequestOptions;
use super::DEFAULT_URL;
use crate::error::{Result, TestClientError};
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE};
use http::Method;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// In-memory stand-in for an incoming HTTP request.
///
/// Built fresh for every operation from the client's current
/// [`RequestOptions`]. The method is always POST.
#[derive(Debug, Clone)]
pub struct MockRequest {
    method: Method,
    url: String,
    headers: HeaderMap,
    query: Map<String, Value>,
    cookies: BTreeMap<String, String>,
    params: Map<String, Value>,
    body: Value,
    session: Option<Value>,
    extra: Map<String, Value>,
}

impl MockRequest {
    /// Create a mock request, merging `options` onto the defaults.
    pub fn new(options: &RequestOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                TestClientError::InvalidMockRequest(format!("header name '{}': {}", name, e))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                TestClientError::InvalidMockRequest(format!("header '{}' value: {}", name, e))
            })?;
            headers.insert(header_name, header_value);
        }

        let request = Self {
            method: Method::POST,
            url: options
                .url
                .clone()
                .unwrap_or_else(|| DEFAULT_URL.to_string()),
            headers,
            query: options.query.clone(),
            cookies: options.cookies.clone(),
            params: options.params.clone(),
            body: options
                .body
                .clone()
                .unwrap_or_else(|| Value::Object(Map::new())),
            session: options.session.clone(),
            extra: options.extra.clone(),
        };

        http::Uri::try_from(request.uri_with_query()).map_err(|e| {
            TestClientError::InvalidMockRequest(format!("url '{}': {}", request.url, e))
        })?;

        Ok(request)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Path component of the URL, without the query string.
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or_default()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text; `None` when missing or not visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn query(&self) -> &Map<String, Value> {
        &self.query
    }

    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn session(&self) -> Option<&Value> {
        self.session.as_ref()
    }

    /// Free-form field supplied through the request overrides.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.extra.get(field)
    }

    /// Convert to a framework-agnostic `http::Request`.
    ///
    /// Query parameters are appended to the URL, cookies are folded into a
    /// `cookie` header and the body is serialized as JSON.
    pub fn to_http_request(&self) -> Result<http::Request<String>> {
        let mut builder = http::Request::builder()
            .method(self.method.clone())
            .uri(self.uri_with_query());

        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        if !self.cookies.is_empty() && !self.headers.contains_key(COOKIE) {
            let cookie = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(COOKIE, cookie);
        }

        if !self.headers.contains_key(CONTENT_TYPE) {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }

        let body = serde_json::to_string(&self.body)
            .map_err(|e| TestClientError::InvalidMockRequest(format!("body: {}", e)))?;

        builder
            .body(body)
            .map_err(|e| TestClientError::InvalidMockRequest(e.to_string()))
    }

    fn uri_with_query(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }

        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.query {
            if let Value::Array(items) = value {
                for item in items {
                    serializer.append_pair(name, &query_value(item));
                }
            } else {
                serializer.append_pair(name, &query_value(value));
            }
        }

        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.url, separator, serializer.finish())
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
