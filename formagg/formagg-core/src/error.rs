//! Error types for schema loading and element validation.

/// Returned by the typed accessors on [`Value`](crate::Value).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} value, found {actual}")]
pub struct ValueTypeError {
    pub expected: String,
    pub actual: &'static str,
}

impl ValueTypeError {
    pub fn new(expected: impl Into<String>, actual: &'static str) -> Self {
        Self {
            expected: expected.into(),
            actual,
        }
    }
}

/// Returned when parsing an [`ElementType`](crate::ElementType) from a name
/// outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown element type '{0}'")]
pub struct UnknownElementType(pub String);

/// Schema-authoring errors. These are fatal to form deployment and must be
/// fixed by the form designer.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Schema text could not be parsed.
    #[error("failed to parse form schema: {0}")]
    Json(#[from] serde_json::Error),

    /// Two fields share an identifier.
    #[error("duplicate field identifier '{field}'")]
    DuplicateField { field: String },

    /// An aggregation lists a source that is not a field of the schema.
    #[error("aggregation '{aggregation}' references unknown source field '{source_field}'")]
    UnknownSourceField {
        aggregation: String,
        source_field: String,
    },

    /// Aggregations depend on each other in a loop; `aggregation` is on the loop.
    #[error("aggregation '{aggregation}' is part of a dependency cycle")]
    CyclicDependency { aggregation: String },
}

/// Returned by [`ElementHandler::validate`](crate::ElementHandler::validate).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ElementError {
    #[error("field '{field}' does not accept {found} values")]
    InvalidValue { field: String, found: &'static str },

    #[error("field '{field}' of type '{element_type}' cannot be handled by the '{handler}' element")]
    WrongElement {
        field: String,
        element_type: String,
        handler: String,
    },
}
