//! `async-graphql` backed server

use super::{GraphQLServer, HttpQueryError, HttpQueryRequest, HttpQueryResponse};
use crate::app::App;
use crate::mock::{MockRequest, MockResponse, DEFAULT_URL};
use anyhow::{bail, Context, Result};
use async_graphql::{Data, ObjectType, Schema, SubscriptionType, Variables};
use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method, StatusCode};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

type ContextBuilder =
    dyn Fn(&MockRequest, &mut MockResponse, &mut Data) -> Result<()> + Send + Sync;

/// Serves an `async_graphql::Schema` to the test client.
///
/// The optional context builder plays the role of a per-request `context`
/// callback: it sees the mock request and response and fills the
/// `async_graphql::Data` resolvers read through `Context::data`. The
/// transport request (`http::Request<String>`) is always added to that data
/// as well.
pub struct SchemaServer<Query, Mutation, Subscription> {
    schema: Schema<Query, Mutation, Subscription>,
    path: String,
    context: Option<Arc<ContextBuilder>>,
    mounted: AtomicBool,
}

// Manual Debug implementation since the context builder is a trait object
impl<Query, Mutation, Subscription> std::fmt::Debug for SchemaServer<Query, Mutation, Subscription> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaServer")
            .field("path", &self.path)
            .field("has_context", &self.context.is_some())
            .field("mounted", &self.mounted)
            .finish()
    }
}

/// Options resolved for one request.
pub struct SchemaOptions<Query, Mutation, Subscription> {
    pub schema: Schema<Query, Mutation, Subscription>,
    pub data: Data,
}

impl<Query, Mutation, Subscription> std::fmt::Debug for SchemaOptions<Query, Mutation, Subscription> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaOptions").finish_non_exhaustive()
    }
}

impl<Query, Mutation, Subscription> SchemaServer<Query, Mutation, Subscription>
where
    Query: ObjectType + 'static,
    Mutation: ObjectType + 'static,
    Subscription: SubscriptionType + 'static,
{
    pub fn new(schema: Schema<Query, Mutation, Subscription>) -> Self {
        Self {
            schema,
            path: DEFAULT_URL.to_string(),
            context: None,
            mounted: AtomicBool::new(false),
        }
    }

    /// Path the schema is mounted at (default `/graphql`).
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Install a per-request context builder.
    pub fn context<F>(mut self, builder: F) -> Self
    where
        F: Fn(&MockRequest, &mut MockResponse, &mut Data) -> Result<()> + Send + Sync + 'static,
    {
        self.context = Some(Arc::new(builder));
        self
    }

    pub fn schema(&self) -> &Schema<Query, Mutation, Subscription> {
        &self.schema
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    fn variables(variables: Option<Value>) -> Result<Variables, HttpQueryError> {
        match variables {
            None | Some(Value::Null) => Ok(Variables::default()),
            Some(value @ Value::Object(_)) => Ok(Variables::from_json(value)),
            Some(_) => Err(HttpQueryError::bad_request("Variables are invalid JSON.")),
        }
    }
}

#[async_trait]
impl<Query, Mutation, Subscription> GraphQLServer for SchemaServer<Query, Mutation, Subscription>
where
    Query: ObjectType + 'static,
    Mutation: ObjectType + 'static,
    Subscription: SubscriptionType + 'static,
{
    type Options = SchemaOptions<Query, Mutation, Subscription>;

    fn apply_middleware(&self, app: &mut App) -> Result<()> {
        app.mount(self.path.clone(), "async-graphql");
        self.mounted.store(true, Ordering::Release);
        Ok(())
    }

    async fn create_options(
        &self,
        request: &MockRequest,
        response: &mut MockResponse,
    ) -> Result<Self::Options> {
        if !self.is_mounted() {
            bail!(
                "Schema is not mounted at {}; apply_middleware must run before executing operations",
                self.path
            );
        }

        let mut data = Data::default();
        if let Some(builder) = &self.context {
            builder(request, response, &mut data).context("Context builder failed")?;
        }

        Ok(SchemaOptions {
            schema: self.schema.clone(),
            data,
        })
    }

    async fn run_http_query(
        &self,
        request: HttpQueryRequest<Self::Options>,
    ) -> Result<HttpQueryResponse> {
        let HttpQueryRequest {
            method,
            options,
            query,
            request: http_request,
        } = request;

        if method != Method::GET && method != Method::POST {
            return Err(HttpQueryError::new(
                StatusCode::METHOD_NOT_ALLOWED,
                "GraphQL only supports GET and POST requests.",
            )
            .into());
        }

        if query.query.trim().is_empty() {
            return Err(HttpQueryError::bad_request("Must provide query string.").into());
        }

        let variables = Self::variables(query.variables)?;

        let mut gql_request = async_graphql::Request::new(query.query).variables(variables);
        if let Some(name) = query.operation_name {
            gql_request = gql_request.operation_name(name);
        }
        gql_request.data = options.data;
        gql_request.data.insert(http_request);

        let response = options.schema.execute(gql_request).await;
        debug!(
            "Executed operation against {} ({} errors)",
            self.path,
            response.errors.len()
        );

        // Parse and validation failures carry no path and produce no data.
        if matches!(response.data, async_graphql::Value::Null)
            && !response.errors.is_empty()
            && response.errors.iter().all(|e| e.path.is_empty())
        {
            let errors = serde_json::json!({ "errors": response.errors });
            return Err(HttpQueryError::bad_request(errors.to_string()).into());
        }

        let mut http_response = HttpQueryResponse::new(
            serde_json::to_string(&response).context("Failed to serialize GraphQL response")?,
        );
        http_response
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(http_response)
    }
}
