//! GraphQL operations: raw text or a parsed document

use crate::error::{Result, TestClientError};
use graphql_parser::query::{parse_query, Document};

/// A single GraphQL query or mutation.
///
/// The server entry point only accepts text, so documents are rendered to
/// their canonical form before being sent.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Text(String),
    Document(Document<'static, String>),
}

impl Operation {
    /// Parse query text into a structured document.
    pub fn parse(text: &str) -> Result<Self> {
        let document = parse_query::<String>(text)
            .map_err(|e| TestClientError::MalformedOperation(e.to_string()))?
            .into_static();
        Ok(Operation::Document(document))
    }

    /// Normalize to query text.
    ///
    /// Text passes through untouched. A document must contain at least one
    /// definition and its rendering must parse back as GraphQL.
    pub fn render(&self) -> Result<String> {
        match self {
            Operation::Text(text) => Ok(text.clone()),
            Operation::Document(document) => {
                if document.definitions.is_empty() {
                    return Err(TestClientError::MalformedOperation(
                        "document contains no definitions".to_string(),
                    ));
                }

                let rendered = document.to_string();
                parse_query::<&str>(&rendered).map_err(|e| {
                    TestClientError::MalformedOperation(format!(
                        "document does not render to valid GraphQL: {}",
                        e
                    ))
                })?;

                Ok(rendered)
            }
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self, Operation::Document(_))
    }
}

impl From<&str> for Operation {
    fn from(text: &str) -> Self {
        Operation::Text(text.to_string())
    }
}

impl From<String> for Operation {
    fn from(text: String) -> Self {
        Operation::Text(text)
    }
}

impl From<&String> for Operation {
    fn from(text: &String) -> Self {
        Operation::Text(text.clone())
    }
}

impl From<Document<'static, String>> for Operation {
    fn from(document: Document<'static, String>) -> Self {
        Operation::Document(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_passes_through() {
        let op = Operation::from("{ books { title } }");
        assert!(!op.is_document());
        assert_eq!(op.render().unwrap(), "{ books { title } }");
    }

    #[test]
    fn test_document_renders_canonical_text() {
        let op = Operation::parse("query   GetBooks { books(first: 1) { title author } }").unwrap();
        assert!(op.is_document());

        let rendered = op.render().unwrap();
        assert!(rendered.starts_with("query GetBooks {"));
        assert!(rendered.contains("books(first: 1)"));

        // Rendering is stable once canonical.
        let again = Operation::parse(&rendered).unwrap().render().unwrap();
        assert_eq!(rendered, again);
    }

    #[test]
    fn test_empty_document_is_malformed() {
        let op = Operation::Document(Document {
            definitions: Vec::new(),
        });

        let err = op.render().unwrap_err();
        assert!(matches!(err, TestClientError::MalformedOperation(_)));
    }

    #[test]
    fn test_document_with_invalid_field_name_is_malformed() {
        use graphql_parser::query::{Definition, OperationDefinition, Selection};

        let mut document = match Operation::parse("query Q { books }").unwrap() {
            Operation::Document(document) => document,
            Operation::Text(_) => panic!("expected a document"),
        };
        match &mut document.definitions[0] {
            Definition::Operation(OperationDefinition::Query(query)) => {
                match &mut query.selection_set.items[0] {
                    Selection::Field(field) => field.name = "bad name!".to_string(),
                    other => panic!("unexpected selection: {:?}", other),
                }
            }
            other => panic!("unexpected definition: {:?}", other),
        }

        let err = Operation::Document(document).render().unwrap_err();
        assert!(matches!(err, TestClientError::MalformedOperation(_)));
        assert!(err.to_string().contains("does not render to valid GraphQL"));
    }

    #[test]
    fn test_parse_rejects_invalid_text() {
        let err = Operation::parse("query {").unwrap_err();
        assert_eq!(err.code(), "MALFORMED_OPERATION");
    }
}
