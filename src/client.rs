//! In-process test client
//!
//! Runs operations against a [`GraphQLServer`] through a mocked HTTP
//! request/response pair. Each call walks the same pipeline:
//! normalize → mock → configure → execute → parse.

use crate::adapters::{GraphQLServer, HttpQueryRequest, QueryPayload};
use crate::app::App;
use crate::error::{Result, TestClientError};
use crate::mock::{MockRequest, MockResponse, RequestOptions, ResponseOptions};
use crate::operation::Operation;
use crate::output::ExecutionResult;
use graphql_client::GraphQLQuery;
use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub variables: Option<Value>,
    pub operation_name: Option<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variables(variables: Value) -> Self {
        Self {
            variables: Some(variables),
            operation_name: None,
        }
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

impl From<Value> for QueryOptions {
    fn from(variables: Value) -> Self {
        Self::variables(variables)
    }
}

/// Mock override configuration.
///
/// At construction, missing halves fall back to defaults. In
/// [`TestClient::set_options`], only the halves that are present replace the
/// stored configuration.
#[derive(Debug, Clone, Default)]
pub struct MockOptions {
    pub request: Option<RequestOptions>,
    pub response: Option<ResponseOptions>,
}

impl MockOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(mut self, request: RequestOptions) -> Self {
        self.request = Some(request);
        self
    }

    pub fn response(mut self, response: ResponseOptions) -> Self {
        self.response = Some(response);
        self
    }
}

/// Configuration snapshot a single call works from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockConfig {
    pub request: RequestOptions,
    pub response: ResponseOptions,
}

/// Executes GraphQL operations against a server without a network listener.
///
/// `query` and `mutate` run the exact same pipeline; the two names only
/// document intent at the call site.
pub struct TestClient<S: GraphQLServer> {
    server: Arc<S>,
    app: App,
    config: RwLock<Arc<MockConfig>>,
}

// Manual Debug implementation since the server need not be Debug
impl<S: GraphQLServer> std::fmt::Debug for TestClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestClient")
            .field("app", &self.app)
            .field("config", &self.config)
            .finish()
    }
}

/// Create a client for `server` with default mocks.
pub fn create_test_client<S: GraphQLServer>(server: S) -> Result<TestClient<S>> {
    TestClient::with_options(server, MockOptions::default())
}

impl<S: GraphQLServer> TestClient<S> {
    /// Create a client, registering `server` with a fresh [`App`].
    pub fn new(server: S) -> Result<Self> {
        Self::with_options(server, MockOptions::default())
    }

    pub fn with_options(server: S, options: MockOptions) -> Result<Self> {
        let mut app = App::new();
        server.apply_middleware(&mut app).map_err(|e| {
            warn!("Server registration failed: {:#}", e);
            TestClientError::ServerConfiguration(e)
        })?;

        let config = MockConfig {
            request: options.request.unwrap_or_default(),
            response: options.response.unwrap_or_default(),
        };

        Ok(Self {
            server: Arc::new(server),
            app,
            config: RwLock::new(Arc::new(config)),
        })
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    /// Application the server registered itself with.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Current override configuration.
    pub fn options(&self) -> Arc<MockConfig> {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the request and/or response overrides used by later calls.
    ///
    /// Calls already past their configuration snapshot are unaffected.
    pub fn set_options(&self, options: MockOptions) {
        if options.request.is_none() && options.response.is_none() {
            debug!("set_options called without overrides; keeping configuration");
            return;
        }

        let mut guard = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = MockConfig::clone(&guard);
        if let Some(request) = options.request {
            next.request = request;
        }
        if let Some(response) = options.response {
            next.response = response;
        }
        *guard = Arc::new(next);
    }

    /// Run a query.
    pub async fn query(
        &self,
        operation: impl Into<Operation>,
        options: impl Into<QueryOptions>,
    ) -> Result<ExecutionResult> {
        self.execute(operation.into(), options.into()).await
    }

    /// Run a mutation.
    pub async fn mutate(
        &self,
        operation: impl Into<Operation>,
        options: impl Into<QueryOptions>,
    ) -> Result<ExecutionResult> {
        self.execute(operation.into(), options.into()).await
    }

    /// Run a query, deserializing `data` into `T`.
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        operation: impl Into<Operation>,
        options: impl Into<QueryOptions>,
    ) -> Result<ExecutionResult<T>> {
        self.execute(operation.into(), options.into()).await
    }

    /// Run a mutation, deserializing `data` into `T`.
    pub async fn mutate_as<T: DeserializeOwned>(
        &self,
        operation: impl Into<Operation>,
        options: impl Into<QueryOptions>,
    ) -> Result<ExecutionResult<T>> {
        self.execute(operation.into(), options.into()).await
    }

    /// Run a typed `graphql_client` operation.
    pub async fn run<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<ExecutionResult<Q::ResponseData>> {
        let body = Q::build_query(variables);
        let variables = serde_json::to_value(&body.variables).map_err(TestClientError::InvalidVariables)?;
        let options = QueryOptions {
            variables: Some(variables),
            operation_name: Some(body.operation_name.to_string()),
        };

        self.execute(Operation::from(body.query), options).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: Operation,
        options: QueryOptions,
    ) -> Result<ExecutionResult<T>> {
        let config = self.options();

        let query = operation.render()?;
        debug!(
            "Executing operation ({} bytes, document: {})",
            query.len(),
            operation.is_document()
        );

        let request = MockRequest::new(&config.request)?;
        let mut response = MockResponse::new(&config.response)?;
        let http_request = request.to_http_request()?;

        let server_options = self
            .server
            .create_options(&request, &mut response)
            .await
            .map_err(|e| {
                warn!("Server options resolution failed: {:#}", e);
                TestClientError::ServerConfiguration(e)
            })?;

        let http_query = HttpQueryRequest {
            method: Method::POST,
            options: server_options,
            query: QueryPayload {
                query,
                variables: options.variables,
                operation_name: options.operation_name,
            },
            request: http_request,
        };

        let http_response = self.server.run_http_query(http_query).await.map_err(|e| {
            warn!("Query execution failed: {:#}", e);
            TestClientError::QueryExecution(e)
        })?;
        debug!("Server responded with {}", http_response.status);

        serde_json::from_str(&http_response.graphql_response).map_err(|e| {
            warn!("Response body is not a GraphQL result: {}", e);
            TestClientError::ResponseParse(e)
        })
    }
}
