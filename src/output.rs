//! Execution results as returned by the server

use serde_json::Value;

/// Parsed GraphQL response body.
///
/// `data` is `None` both when the server sent `null` and when it omitted the
/// field; `errors` is `None` when the operation produced no errors.
pub type ExecutionResult<T = Value> = graphql_client::Response<T>;

/// A single entry of the `errors` sequence.
pub type GraphQLError = graphql_client::Error;

/// Assertion helpers on [`ExecutionResult`].
pub trait ExecutionResultExt {
    /// Errors reported by the server, empty when there were none.
    fn error_messages(&self) -> Vec<&str>;

    fn first_error_message(&self) -> Option<&str> {
        self.error_messages().into_iter().next()
    }

    fn has_errors(&self) -> bool {
        !self.error_messages().is_empty()
    }

    /// Panic with the server's error messages if any were reported.
    fn assert_no_errors(&self) {
        let messages = self.error_messages();
        assert!(
            messages.is_empty(),
            "Expected no GraphQL errors, but got: {:?}",
            messages
        );
    }
}

impl<T> ExecutionResultExt for ExecutionResult<T> {
    fn error_messages(&self) -> Vec<&str> {
        self.errors
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|e| e.message.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_body() {
        let result: ExecutionResult =
            serde_json::from_value(json!({ "data": { "books": [] } })).unwrap();

        assert_eq!(result.data, Some(json!({ "books": [] })));
        assert!(result.errors.is_none());
        assert!(!result.has_errors());
        result.assert_no_errors();
    }

    #[test]
    fn test_error_body() {
        let result: ExecutionResult = serde_json::from_value(json!({
            "data": null,
            "errors": [{
                "message": "`first` must be a positive integer",
                "locations": [{ "line": 2, "column": 5 }],
                "path": ["books"]
            }]
        }))
        .unwrap();

        assert!(result.data.is_none());
        assert!(result.has_errors());
        assert_eq!(
            result.first_error_message(),
            Some("`first` must be a positive integer")
        );
    }

    #[test]
    #[should_panic(expected = "Expected no GraphQL errors")]
    fn test_assert_no_errors_panics() {
        let result: ExecutionResult = serde_json::from_value(json!({
            "data": null,
            "errors": [{ "message": "boom" }]
        }))
        .unwrap();

        result.assert_no_errors();
    }
}
