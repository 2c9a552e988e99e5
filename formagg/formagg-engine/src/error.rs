//! Error types for the registry and the submission codec.

use formagg_core::Value;

/// Errors produced by [`FieldRegistry`](crate::FieldRegistry) writes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// Aggregation values are written only by the recompute engine.
    #[error("field '{field}' is computed and cannot be set directly")]
    ReadOnlyField { field: String },

    #[error("field '{field}' is not part of the form schema")]
    UnknownField { field: String },
}

/// Errors produced at the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Persisted text is not valid JSON.
    #[error("failed to parse persisted submission: {0}")]
    Json(#[from] serde_json::Error),

    /// Persisted JSON is valid but not an object keyed by field identifier.
    #[error("persisted submission must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    /// A field holds an array or object; only scalars are supported.
    #[error("field '{field}' holds an unsupported {found} value")]
    UnsupportedValue { field: String, found: &'static str },

    /// The input fields sum to a value outside the finite `f64` range.
    #[error("aggregation '{field}' overflows")]
    NonFiniteTotal { field: String },

    /// A persisted aggregation value disagrees with a fresh recomputation.
    #[error("aggregation '{field}' was submitted as {persisted} but recomputes to {recomputed}")]
    AggregationMismatch {
        field: String,
        persisted: Value,
        recomputed: Value,
    },
}
