//! Mocked HTTP request/response pair
//!
//! Servers never see a real connection: each operation gets a fresh
//! [`MockRequest`] and [`MockResponse`] built from the client's override
//! mappings.

mod config;
mod request;
mod response;

pub use config::{RequestOptions, ResponseOptions};
pub use request::MockRequest;
pub use response::MockResponse;

/// Default request URL when no override is given
pub const DEFAULT_URL: &str = "/graphql";
