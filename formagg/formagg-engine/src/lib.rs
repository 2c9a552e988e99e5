//! Evaluation engine for derived form fields.
//!
//! A [`FormSchema`](formagg_core::FormSchema) is turned into an
//! [`EvaluationPlan`] once by [`build_plan`]. Each submission attempt then
//! owns a [`FieldRegistry`]; after every field change [`recompute`] brings
//! the affected aggregations up to date in plan order. The [`encode`] /
//! [`decode`] / [`validate`] functions move values across the persistence
//! boundary and reject forged aggregation results.

mod codec;
mod error;
mod plan;
mod recompute;
mod registry;

pub use codec::{PersistedSubmission, decode, encode, validate};
pub use error::{CodecError, RegistryError};
pub use plan::{EvaluationPlan, build_plan, build_plan_with};
pub use recompute::{recompute, recompute_all, sum_sources};
pub use registry::{FieldRegistry, FieldValueSet};
