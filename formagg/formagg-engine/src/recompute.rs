//! Recompute engine: brings aggregation values up to date after a change.

use formagg_core::{NumericPolicy, Value};

use crate::{plan::EvaluationPlan, registry::FieldRegistry};

/// Recompute every aggregation that depends on `changed_field_id`, in plan order.
///
/// Returns the identifiers whose stored value actually changed, in the order
/// they were evaluated. A second call without further input changes returns
/// an empty list.
///
/// `registry` must have been created for the schema `plan` was built from.
pub fn recompute(
    plan: &EvaluationPlan,
    registry: &mut FieldRegistry,
    changed_field_id: &str,
) -> Vec<String> {
    let affected = plan.affected_by(changed_field_id);
    if affected.is_empty() {
        return Vec::new();
    }
    let updated = evaluate(plan, registry, affected);
    tracing::debug!(
        changed = changed_field_id,
        updated = updated.len(),
        "recomputed aggregations"
    );
    updated
}

/// Recompute every aggregation in plan order, as if every input field changed.
pub fn recompute_all(plan: &EvaluationPlan, registry: &mut FieldRegistry) -> Vec<String> {
    let updated = evaluate(plan, registry, plan.order().iter().map(String::as_str));
    tracing::debug!(updated = updated.len(), "recomputed all aggregations");
    updated
}

/// Sum the current values of `sources`. Absent and non-numeric values count as zero.
///
/// The result stays an `Int` while every contribution is an integer and the
/// total fits in `i64`; otherwise it is a `Float`.
/// A `Float` total can overflow to infinity; such a total is never persisted
/// ([`validate`](crate::validate) rejects it) and callers editing a registry
/// should undo the change that produced it.
pub fn sum_sources(sources: &[String], registry: &FieldRegistry, policy: NumericPolicy) -> Value {
    sources
        .iter()
        .filter_map(|id| registry.get(id))
        .filter_map(|value| value.as_numeric(policy))
        .fold(Total::Int(0), Total::add)
        .into()
}

fn evaluate<'a>(
    plan: &EvaluationPlan,
    registry: &mut FieldRegistry,
    ids: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let mut updated = Vec::new();
    for id in ids {
        let total = sum_sources(plan.sources(id), registry, plan.policy());
        if registry.store_computed(id, total) {
            updated.push(id.to_string());
        }
    }
    updated
}

#[derive(Clone, Copy)]
enum Total {
    Int(i64),
    Float(f64),
}

impl Total {
    fn add(self, value: Value) -> Self {
        match (self, value) {
            (Total::Int(a), Value::Int(b)) => a
                .checked_add(b)
                .map(Total::Int)
                .unwrap_or_else(|| Total::Float(a as f64 + b as f64)),
            (Total::Int(a), Value::Float(b)) => Total::Float(a as f64 + b),
            (Total::Float(a), Value::Int(b)) => Total::Float(a + b as f64),
            (Total::Float(a), Value::Float(b)) => Total::Float(a + b),
            (total, _) => total,
        }
    }
}

impl From<Total> for Value {
    fn from(total: Total) -> Self {
        match total {
            Total::Int(v) => Value::Int(v),
            Total::Float(v) => Value::Float(v),
        }
    }
}
