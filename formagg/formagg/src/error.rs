//! Error types for forms and sessions.

use formagg_core::{ElementError, SchemaError};
use formagg_engine::{CodecError, RegistryError};

/// Errors produced by [`Form`](crate::Form) and [`FormSession`](crate::FormSession).
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// The schema cannot be deployed (cycle, unknown source, duplicate id, bad JSON).
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Element(#[from] ElementError),

    /// Changing `changed` would push aggregation `field` beyond the finite
    /// `f64` range; the change was not applied.
    #[error("changing '{changed}' makes aggregation '{field}' overflow")]
    NonFiniteTotal { field: String, changed: String },

    /// No [`ElementHandler`](formagg_core::ElementHandler) was registered for
    /// the element type of a schema field.
    #[error("no element handler registered for type '{element_type}' (field '{field}')")]
    NoElementHandler { element_type: String, field: String },
}
