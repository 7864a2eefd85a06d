//! GraphQL server adapters
//!
//! The test client talks to a server only through [`GraphQLServer`]:
//! - Middleware registration against an [`App`]
//! - Per-request options resolution from the mocked request/response
//! - Query execution returning the serialized response body
//!
//! Any execution engine implementing the trait can be driven by a
//! [`TestClient`](crate::TestClient).

#[cfg(feature = "schema-server")]
pub mod graphql;

use crate::app::App;
use crate::mock::{MockRequest, MockResponse};
use anyhow::Result;
use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `query` part of an HTTP GraphQL request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPayload {
    pub query: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

/// Everything a server needs to execute one operation.
#[derive(Debug)]
pub struct HttpQueryRequest<O> {
    pub method: Method,
    /// Options resolved by [`GraphQLServer::create_options`]
    pub options: O,
    pub query: QueryPayload,
    /// Framework-agnostic form of the mock request
    pub request: http::Request<String>,
}

/// Result of a successful HTTP-level execution.
#[derive(Debug, Clone)]
pub struct HttpQueryResponse {
    /// Serialized GraphQL response body
    pub graphql_response: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl HttpQueryResponse {
    pub fn new(graphql_response: String) -> Self {
        Self {
            graphql_response,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
        }
    }
}

/// Transport-level failure raised before a GraphQL response exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {message}")]
pub struct HttpQueryError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpQueryError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

/// A GraphQL server the test client can drive in-process.
#[async_trait]
pub trait GraphQLServer: Send + Sync {
    /// Execution configuration resolved per request (schema, context, ...)
    type Options: Send;

    /// Register the server with an HTTP application.
    ///
    /// Called exactly once per client, before any operation runs.
    fn apply_middleware(&self, app: &mut App) -> Result<()>;

    /// Resolve execution options for a request/response pair.
    async fn create_options(
        &self,
        request: &MockRequest,
        response: &mut MockResponse,
    ) -> Result<Self::Options>;

    /// Execute an operation and return the serialized response body.
    ///
    /// Resolver failures belong in the body; `Err` is reserved for
    /// transport-level failures such as [`HttpQueryError`].
    async fn run_http_query(
        &self,
        request: HttpQueryRequest<Self::Options>,
    ) -> Result<HttpQueryResponse>;
}

#[async_trait]
impl<S: GraphQLServer + ?Sized> GraphQLServer for std::sync::Arc<S> {
    type Options = S::Options;

    fn apply_middleware(&self, app: &mut App) -> Result<()> {
        (**self).apply_middleware(app)
    }

    async fn create_options(
        &self,
        request: &MockRequest,
        response: &mut MockResponse,
    ) -> Result<Self::Options> {
        (**self).create_options(request, response).await
    }

    async fn run_http_query(
        &self,
        request: HttpQueryRequest<Self::Options>,
    ) -> Result<HttpQueryResponse> {
        (**self).run_http_query(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_payload_wire_format() {
        let payload = QueryPayload {
            query: "{ books { title } }".to_string(),
            variables: Some(json!({ "first": 1 })),
            operation_name: Some("GetBooks".to_string()),
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["operationName"], "GetBooks");
        assert_eq!(value["variables"]["first"], 1);

        let bare = QueryPayload {
            query: "{ books { title } }".to_string(),
            variables: None,
            operation_name: None,
        };
        let value = serde_json::to_value(&bare).unwrap();
        assert!(value.get("variables").is_none());
        assert!(value.get("operationName").is_none());
    }

    #[test]
    fn test_http_query_error_display() {
        let err = HttpQueryError::bad_request("Must provide query string.");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "400 Bad Request: Must provide query string.");
    }
}
