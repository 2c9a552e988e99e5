//! Submission codec: moves field values across the persistence boundary.
//!
//! The persisted form is a JSON object keyed by field identifier. Decoding
//! trusts aggregation values only provisionally; [`validate`] recomputes them
//! from the input fields and rejects any disagreement.

use formagg_core::{FormSchema, NumericPolicy, Value};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as Json};

use crate::{
    error::CodecError,
    plan::EvaluationPlan,
    recompute::recompute_all,
    registry::{FieldRegistry, FieldValueSet},
};

/// Stored representation of one submission.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedSubmission(Map<String, Json>);

impl PersistedSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, CodecError> {
        match serde_json::from_str::<Json>(text)? {
            Json::Object(map) => Ok(Self(map)),
            other => Err(CodecError::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }

    pub fn to_json_string(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(&self.0)?)
    }

    pub fn get(&self, id: &str) -> Option<&Json> {
        self.0.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, value: Json) -> Option<Json> {
        self.0.insert(id.into(), value)
    }

    pub fn as_map(&self) -> &Map<String, Json> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Json> {
        self.0
    }
}

impl From<Map<String, Json>> for PersistedSubmission {
    fn from(value: Map<String, Json>) -> Self {
        Self(value)
    }
}

/// Serialize the registry's current values.
///
/// Fields are visited in declaration order. Unset input fields are omitted;
/// aggregations are always written from the value the recompute engine last
/// stored (`null` if it never ran).
pub fn encode(registry: &FieldRegistry) -> PersistedSubmission {
    let mut out = Map::new();
    for field in registry.schema().fields() {
        match registry.get(&field.id) {
            Some(value) => {
                out.insert(field.id.clone(), to_json(value));
            }
            None if field.is_aggregation() => {
                out.insert(field.id.clone(), Json::Null);
            }
            None => {}
        }
    }
    PersistedSubmission(out)
}

/// Load every schema field present in `persisted`, aggregations included.
///
/// Keys that are not schema fields are ignored.
pub fn decode(
    persisted: &PersistedSubmission,
    schema: &FormSchema,
) -> Result<FieldValueSet, CodecError> {
    let mut values = FieldValueSet::new();
    for (id, json) in persisted.as_map() {
        if !schema.contains(id) {
            tracing::debug!(field = id.as_str(), "ignoring unknown persisted field");
            continue;
        }
        values.insert(id.clone(), from_json(id, json)?);
    }
    Ok(values)
}

/// Recompute every aggregation from the input fields of `decoded` and compare
/// with the decoded aggregation values.
///
/// On success returns the recomputed registry. Fails with
/// [`CodecError::NonFiniteTotal`] when the input fields sum beyond the `f64`
/// range, and with [`CodecError::AggregationMismatch`] for the first
/// aggregation (in plan order) whose decoded value is missing or differs
/// numerically.
pub fn validate(
    decoded: &FieldValueSet,
    plan: &EvaluationPlan,
) -> Result<FieldRegistry, CodecError> {
    let mut registry = FieldRegistry::replay(plan.schema().clone(), decoded);
    recompute_all(plan, &mut registry);

    if let Some(id) = plan
        .order()
        .iter()
        .find(|id| registry.get(id).is_some_and(is_non_finite))
    {
        tracing::warn!(field = id.as_str(), "aggregation overflows");
        return Err(CodecError::NonFiniteTotal { field: id.clone() });
    }

    for id in plan.order() {
        let recomputed = registry.get(id).cloned().unwrap_or_default();
        let persisted = decoded.get(id).cloned().unwrap_or_default();
        if !numeric_eq(&persisted, &recomputed, plan.policy()) {
            tracing::warn!(
                field = id.as_str(),
                %persisted,
                %recomputed,
                "persisted aggregation does not match recomputation"
            );
            return Err(CodecError::AggregationMismatch {
                field: id.clone(),
                persisted,
                recomputed,
            });
        }
    }
    Ok(registry)
}

fn is_non_finite(value: &Value) -> bool {
    matches!(value, Value::Float(v) if !v.is_finite())
}

fn numeric_eq(persisted: &Value, recomputed: &Value, policy: NumericPolicy) -> bool {
    match (persisted.as_numeric(policy), recomputed.as_numeric(policy)) {
        (Some(Value::Int(a)), Some(Value::Int(b))) => a == b,
        (Some(a), Some(b)) => matches!(
            (a.try_f64(), b.try_f64()),
            (Ok(Some(x)), Ok(Some(y))) if x == y
        ),
        _ => false,
    }
}

fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(v) => Json::Bool(*v),
        Value::Int(v) => Json::Number((*v).into()),
        Value::Float(v) => Number::from_f64(*v).map_or(Json::Null, Json::Number),
        Value::Text(v) => Json::String(v.to_string()),
    }
}

fn from_json(id: &str, json: &Json) -> Result<Value, CodecError> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(v) => Ok(Value::Bool(*v)),
        Json::Number(n) => Ok(match n.as_i64() {
            Some(v) => Value::Int(v),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        }),
        Json::String(s) => Ok(Value::text(s)),
        Json::Array(_) | Json::Object(_) => Err(CodecError::UnsupportedValue {
            field: id.to_string(),
            found: json_kind(json),
        }),
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
