//! Framework-agnostic core types for `formagg`.
//!
//! This crate provides the form schema representation ([`FormSchema`] /
//! [`FieldDef`]), the scalar [`Value`] carried by form fields, and the
//! [`ElementHandler`] trait used to register element types.

mod element;
mod element_type;
mod error;
mod policy;
mod schema;
mod value;

pub use element::{ElementHandler, ElementInfo, RenderedElement};
pub use element_type::ElementType;
pub use error::{ElementError, SchemaError, UnknownElementType, ValueTypeError};
pub use policy::NumericPolicy;
pub use schema::{AggregationDef, FieldDef, FieldKind, FormSchema, format_form_schema};
pub use value::Value;
