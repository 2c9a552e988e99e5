//! Dependency resolution: orders aggregation fields so that every
//! aggregation is evaluated after the aggregations it sums.
//!
//! Edges run from a source aggregation to the aggregation consuming it.
//! Input fields never need ordering and are left out of the graph, but they
//! are still recorded as dependents so a change to one can be traced forward.
//!
//! The order is produced by repeatedly taking the ready aggregation
//! (no unevaluated aggregation sources) with the lowest declaration index,
//! so the same schema always yields the same plan.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    sync::Arc,
};

use formagg_core::{AggregationDef, FieldDef, FormSchema, NumericPolicy, SchemaError};

/// Topological evaluation order for the aggregations of one schema.
///
/// Built once per schema and shared read-only across sessions.
#[derive(Debug, Clone)]
pub struct EvaluationPlan {
    schema: Arc<FormSchema>,
    order: Vec<String>,
    /// Field identifier -> aggregations listing it as a source, in declaration order.
    dependents: HashMap<String, Vec<String>>,
    policy: NumericPolicy,
}

impl EvaluationPlan {
    pub fn schema(&self) -> &Arc<FormSchema> {
        &self.schema
    }

    /// Aggregation identifiers in evaluation order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn policy(&self) -> NumericPolicy {
        self.policy
    }

    /// Aggregations that list `id` directly as a source.
    pub fn dependents(&self, id: &str) -> &[String] {
        self.dependents.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Source identifiers of aggregation `id`; empty for input fields.
    pub fn sources(&self, id: &str) -> &[String] {
        self.schema
            .field(id)
            .and_then(FieldDef::aggregation)
            .map(AggregationDef::sources)
            .unwrap_or_default()
    }

    /// Aggregations whose value (transitively) depends on `changed`, in plan order.
    pub fn affected_by(&self, changed: &str) -> Vec<&str> {
        let mut reached = HashSet::new();
        let mut stack = vec![changed];
        while let Some(id) = stack.pop() {
            for dependent in self.dependents(id) {
                if reached.insert(dependent.as_str()) {
                    stack.push(dependent);
                }
            }
        }

        self.order
            .iter()
            .map(String::as_str)
            .filter(|id| reached.contains(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Build the evaluation plan for `schema` with the default [`NumericPolicy`].
pub fn build_plan(schema: impl Into<Arc<FormSchema>>) -> Result<EvaluationPlan, SchemaError> {
    build_plan_with(schema, NumericPolicy::default())
}

/// Build the evaluation plan for `schema`.
///
/// Fails with [`SchemaError::UnknownSourceField`] when a source is missing
/// from the schema and with [`SchemaError::CyclicDependency`] when
/// aggregations depend on each other in a loop (including self-reference).
pub fn build_plan_with(
    schema: impl Into<Arc<FormSchema>>,
    policy: NumericPolicy,
) -> Result<EvaluationPlan, SchemaError> {
    let schema = schema.into();
    let aggregations: Vec<(&FieldDef, &AggregationDef)> = schema.aggregations().collect();

    for (field, def) in &aggregations {
        if let Some(missing) = def.sources().iter().find(|s| !schema.contains(s)) {
            return Err(SchemaError::UnknownSourceField {
                aggregation: field.id.clone(),
                source_field: missing.clone(),
            });
        }
    }

    let slot: HashMap<&str, usize> = aggregations
        .iter()
        .enumerate()
        .map(|(i, (field, _))| (field.id.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; aggregations.len()];
    let mut consumers = vec![Vec::new(); aggregations.len()];
    let mut dependents: HashMap<String, Vec<String>> = HashMap::new();
    for (i, (field, def)) in aggregations.iter().enumerate() {
        for source in def.sources() {
            dependents
                .entry(source.clone())
                .or_default()
                .push(field.id.clone());
            if let Some(&j) = slot.get(source.as_str()) {
                in_degree[i] += 1;
                consumers[j].push(i);
            }
        }
    }

    let mut ready: BTreeSet<usize> = (0..aggregations.len())
        .filter(|&i| in_degree[i] == 0)
        .collect();
    let mut order = Vec::with_capacity(aggregations.len());
    while let Some(i) = ready.pop_first() {
        order.push(aggregations[i].0.id.clone());
        for &k in &consumers[i] {
            in_degree[k] -= 1;
            if in_degree[k] == 0 {
                ready.insert(k);
            }
        }
    }

    if let Some(stuck) = in_degree.iter().position(|&d| d > 0) {
        let member = cycle_member(stuck, &aggregations, &slot, &in_degree);
        return Err(SchemaError::CyclicDependency {
            aggregation: aggregations[member].0.id.clone(),
        });
    }

    tracing::debug!(
        fields = schema.len(),
        aggregations = order.len(),
        "built evaluation plan"
    );

    Ok(EvaluationPlan {
        schema,
        order,
        dependents,
        policy,
    })
}

/// Walk backwards from `start` through aggregations that were never released.
///
/// Every unreleased aggregation has at least one unreleased aggregation source,
/// so after as many steps as there are aggregations the walk is on a cycle.
fn cycle_member(
    start: usize,
    aggregations: &[(&FieldDef, &AggregationDef)],
    slot: &HashMap<&str, usize>,
    in_degree: &[usize],
) -> usize {
    let mut current = start;
    for _ in 0..aggregations.len() {
        let next = aggregations[current]
            .1
            .sources()
            .iter()
            .filter_map(|s| slot.get(s.as_str()).copied())
            .find(|&j| in_degree[j] > 0);
        match next {
            Some(j) => current = j,
            None => break,
        }
    }
    current
}
