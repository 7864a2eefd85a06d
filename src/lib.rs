//! gqltest - in-process GraphQL test client
//!
//! Run queries and mutations against a GraphQL server without a network
//! listener: the client mocks the HTTP request/response pair, drives the
//! server's own request pipeline and parses the body back into an
//! [`ExecutionResult`].
//!
//! ```no_run
//! # #[cfg(feature = "schema-server")]
//! # async fn demo() -> gqltest::Result<()> {
//! use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};
//! use gqltest::{create_test_client, QueryOptions, SchemaServer};
//!
//! struct Query;
//!
//! #[Object]
//! impl Query {
//!     async fn hello(&self) -> &'static str {
//!         "world"
//!     }
//! }
//!
//! let schema = Schema::build(Query, EmptyMutation, EmptySubscription).finish();
//! let client = create_test_client(SchemaServer::new(schema))?;
//!
//! let result = client.query("{ hello }", QueryOptions::new()).await?;
//! assert_eq!(result.data, Some(serde_json::json!({ "hello": "world" })));
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod app;
pub mod client;
pub mod error;
pub mod mock;
pub mod operation;
pub mod output;

// Client entry points
pub use client::{create_test_client, MockConfig, MockOptions, QueryOptions, TestClient};
pub use operation::Operation;
pub use error::{Result, TestClientError};

// Server seam
pub use adapters::{GraphQLServer, HttpQueryError, HttpQueryRequest, HttpQueryResponse, QueryPayload};
pub use app::App;
#[cfg(feature = "schema-server")]
pub use adapters::graphql::{SchemaOptions, SchemaServer};

// Mocks
pub use mock::{MockRequest, MockResponse, RequestOptions, ResponseOptions};

// Results
pub use output::{ExecutionResult, ExecutionResultExt, GraphQLError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
