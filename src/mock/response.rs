//! Mock HTTP response

use super::config::ResponseOptions;
use crate::error::{Result, TestClientError};
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use serde_json::{Map, Value};

/// In-memory stand-in for an outgoing HTTP response.
///
/// Servers receive it mutably while resolving their options, so a context
/// builder can set headers or stash values in `locals`. The client discards
/// it once the operation completes.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: StatusCode,
    headers: HeaderMap,
    locals: Map<String, Value>,
}

impl MockResponse {
    pub fn new(options: &ResponseOptions) -> Result<Self> {
        let status = match options.status {
            Some(code) => StatusCode::from_u16(code).map_err(|e| {
                TestClientError::InvalidMockResponse(format!("status {}: {}", code, e))
            })?,
            None => StatusCode::OK,
        };

        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                TestClientError::InvalidMockResponse(format!("header name '{}': {}", name, e))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                TestClientError::InvalidMockResponse(format!("header '{}' value: {}", name, e))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(Self {
            status,
            headers,
            locals: options.locals.clone(),
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn locals(&self) -> &Map<String, Value> {
        &self.locals
    }

    pub fn local(&self, name: &str) -> Option<&Value> {
        self.locals.get(name)
    }

    pub fn insert_local(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.locals.insert(name.into(), value.into());
    }
}
