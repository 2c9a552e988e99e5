//! Form schema representation.

mod format;
mod types;

pub use format::format_form_schema;
pub use types::{AggregationDef, FieldDef, FieldKind, FormSchema};
