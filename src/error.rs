//! Test client error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TestClientError>;

/// Failures of the execution pipeline itself.
///
/// A GraphQL operation that executes but fails in a resolver is *not* an
/// error here: it comes back as an [`ExecutionResult`](crate::ExecutionResult)
/// whose `errors` field is populated.
#[derive(Error, Debug)]
pub enum TestClientError {
    #[error("Malformed operation: {0}")]
    MalformedOperation(String),

    #[error("Invalid mock request: {0}")]
    InvalidMockRequest(String),

    #[error("Invalid mock response: {0}")]
    InvalidMockResponse(String),

    #[error("Invalid variables: {0}")]
    InvalidVariables(#[source] serde_json::Error),

    #[error("Server configuration failed: {0:#}")]
    ServerConfiguration(#[source] anyhow::Error),

    #[error("Query execution failed: {0:#}")]
    QueryExecution(#[source] anyhow::Error),

    #[error("Response parse failed: {0}")]
    ResponseParse(#[source] serde_json::Error),
}

impl TestClientError {
    /// Short machine-readable code for the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            TestClientError::MalformedOperation(_) => "MALFORMED_OPERATION",
            TestClientError::InvalidMockRequest(_) => "INVALID_MOCK_REQUEST",
            TestClientError::InvalidMockResponse(_) => "INVALID_MOCK_RESPONSE",
            TestClientError::InvalidVariables(_) => "INVALID_VARIABLES",
            TestClientError::ServerConfiguration(_) => "SERVER_CONFIGURATION",
            TestClientError::QueryExecution(_) => "QUERY_EXECUTION",
            TestClientError::ResponseParse(_) => "RESPONSE_PARSE",
        }
    }
}
