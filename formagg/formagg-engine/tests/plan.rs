use std::collections::HashMap;

use formagg_core::{FieldDef, FormSchema, SchemaError};
use formagg_engine::build_plan;
use proptest::prelude::*;

fn schema(fields: Vec<FieldDef>) -> FormSchema {
    FormSchema::new(fields).expect("schema should be valid")
}

#[test]
fn plan_orders_chained_aggregations_after_their_sources() -> Result<(), SchemaError> {
    let plan = build_plan(schema(vec![
        FieldDef::summation("grand_total", "Grand total", ["subtotal", "tax"]),
        FieldDef::number("rent", "Rent"),
        FieldDef::number("tax", "Tax"),
        FieldDef::summation("subtotal", "Subtotal", ["rent"]),
    ]))?;

    assert_eq!(plan.order(), ["subtotal", "grand_total"]);
    assert_eq!(plan.dependents("rent"), ["subtotal"]);
    assert_eq!(plan.dependents("subtotal"), ["grand_total"]);
    assert_eq!(plan.sources("grand_total"), ["subtotal", "tax"]);
    assert!(plan.sources("rent").is_empty());
    Ok(())
}

#[test]
fn independent_aggregations_keep_declaration_order() -> Result<(), SchemaError> {
    let plan = build_plan(schema(vec![
        FieldDef::number("a", "A"),
        FieldDef::summation("z", "Z", ["a"]),
        FieldDef::summation("m", "M", ["a"]),
        FieldDef::summation("b", "B", Vec::<String>::new()),
    ]))?;
    assert_eq!(plan.order(), ["z", "m", "b"]);
    Ok(())
}

#[test]
fn affected_by_follows_dependents_transitively_in_plan_order() -> Result<(), SchemaError> {
    let plan = build_plan(schema(vec![
        FieldDef::number("a", "A"),
        FieldDef::number("b", "B"),
        FieldDef::summation("y", "Y", ["x", "a"]),
        FieldDef::summation("x", "X", ["a", "b"]),
        FieldDef::summation("only_b", "Only B", ["b"]),
    ]))?;

    assert_eq!(plan.affected_by("a"), ["x", "y"]);
    assert_eq!(plan.affected_by("b"), ["x", "y", "only_b"]);
    assert_eq!(plan.affected_by("x"), ["y"]);
    assert!(plan.affected_by("y").is_empty());
    assert!(plan.affected_by("not_a_field").is_empty());
    Ok(())
}

#[test]
fn unknown_source_field_is_reported() {
    let err = build_plan(schema(vec![
        FieldDef::number("a", "A"),
        FieldDef::summation("total", "Total", ["a", "missing"]),
    ]))
    .unwrap_err();
    assert!(matches!(
        err,
        SchemaError::UnknownSourceField { aggregation, source_field }
            if aggregation == "total" && source_field == "missing"
    ));
}

#[test]
fn self_reference_is_a_cycle() {
    let err = build_plan(schema(vec![
        FieldDef::number("a", "A"),
        FieldDef::summation("total", "Total", ["a", "total"]),
    ]))
    .unwrap_err();
    assert!(matches!(err, SchemaError::CyclicDependency { aggregation } if aggregation == "total"));
}

#[test]
fn cycle_report_names_a_participant_not_a_downstream_field() {
    // `before` only consumes the cycle and sits first in declaration order.
    let err = build_plan(schema(vec![
        FieldDef::summation("before", "Before", ["x"]),
        FieldDef::summation("x", "X", ["y"]),
        FieldDef::summation("y", "Y", ["x"]),
    ]))
    .unwrap_err();
    assert!(matches!(
        err,
        SchemaError::CyclicDependency { aggregation } if aggregation == "x" || aggregation == "y"
    ));
}

const MAX_AGGREGATIONS: usize = 8;
const PRIMITIVES: [&str; 3] = ["p0", "p1", "p2"];

/// Aggregation `i` (in topological index) may sum any aggregation `j < i` and any input.
/// Declaration order is a seeded shuffle of the topological order.
fn random_dag(n: usize, edges: &[bool], inputs: &[bool], seed: u64) -> Vec<FieldDef> {
    let mut fields: Vec<FieldDef> = PRIMITIVES.iter().map(|id| FieldDef::number(*id, *id)).collect();
    let mut aggregations: Vec<FieldDef> = (0..n)
        .map(|i| {
            let mut sources: Vec<String> = (0..i)
                .filter(|&j| edges[i * MAX_AGGREGATIONS + j])
                .map(|j| format!("agg{j}"))
                .collect();
            sources.extend(
                PRIMITIVES
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| inputs[i * PRIMITIVES.len() + k])
                    .map(|(_, id)| id.to_string()),
            );
            FieldDef::summation(format!("agg{i}"), format!("Aggregation {i}"), sources)
        })
        .collect();

    let mut state = seed | 1;
    for i in (1..aggregations.len()).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        aggregations.swap(i, (state % (i as u64 + 1)) as usize);
    }
    fields.extend(aggregations);
    fields
}

fn reaches_itself(fields: &[FieldDef], start: &str) -> bool {
    let sources: HashMap<&str, Vec<&str>> = fields
        .iter()
        .filter_map(|f| {
            f.aggregation()
                .map(|def| (f.id.as_str(), def.sources().iter().map(String::as_str).collect()))
        })
        .collect();
    let mut stack: Vec<&str> = sources.get(start).cloned().unwrap_or_default();
    let mut seen = std::collections::HashSet::new();
    while let Some(id) = stack.pop() {
        if id == start {
            return true;
        }
        if seen.insert(id) {
            stack.extend(sources.get(id).cloned().unwrap_or_default());
        }
    }
    false
}

proptest! {
    /// Acyclic schemas produce a permutation of the aggregations that respects every edge.
    #[test]
    fn prop_acyclic_plan_respects_edges(
        n in 1usize..=MAX_AGGREGATIONS,
        edges in prop::collection::vec(any::<bool>(), MAX_AGGREGATIONS * MAX_AGGREGATIONS),
        inputs in prop::collection::vec(any::<bool>(), MAX_AGGREGATIONS * PRIMITIVES.len()),
        seed in any::<u64>(),
    ) {
        let fields = random_dag(n, &edges, &inputs, seed);
        let plan = build_plan(schema(fields.clone())).expect("acyclic schema should plan");

        let mut sorted: Vec<&str> = plan.order().iter().map(String::as_str).collect();
        sorted.sort_unstable();
        let mut expected: Vec<String> = (0..n).map(|i| format!("agg{i}")).collect();
        expected.sort_unstable();
        prop_assert_eq!(sorted, expected.iter().map(String::as_str).collect::<Vec<_>>());

        let position = |id: &str| plan.order().iter().position(|o| o == id);
        for field in &fields {
            if let Some(def) = field.aggregation() {
                for source in def.sources().iter().filter(|s| s.starts_with("agg")) {
                    prop_assert!(position(source.as_str()) < position(field.id.as_str()));
                }
            }
        }
    }

    /// Planning is deterministic for a fixed schema.
    #[test]
    fn prop_plan_is_reproducible(
        n in 1usize..=MAX_AGGREGATIONS,
        edges in prop::collection::vec(any::<bool>(), MAX_AGGREGATIONS * MAX_AGGREGATIONS),
        seed in any::<u64>(),
    ) {
        let inputs = vec![false; MAX_AGGREGATIONS * PRIMITIVES.len()];
        let fields = random_dag(n, &edges, &inputs, seed);
        let first = build_plan(schema(fields.clone())).expect("acyclic schema should plan");
        let second = build_plan(schema(fields)).expect("acyclic schema should plan");
        prop_assert_eq!(first.order(), second.order());
    }

    /// Adding a back edge between two aggregations always yields a cycle error
    /// naming an aggregation that lies on a cycle.
    #[test]
    fn prop_back_edge_is_reported_as_cycle(
        n in 2usize..=MAX_AGGREGATIONS,
        edges in prop::collection::vec(any::<bool>(), MAX_AGGREGATIONS * MAX_AGGREGATIONS),
        pick in any::<(usize, usize)>(),
        seed in any::<u64>(),
    ) {
        let inputs = vec![false; MAX_AGGREGATIONS * PRIMITIVES.len()];
        let mut edges = edges;
        let low = pick.0 % (n - 1);
        let high = low + 1 + pick.1 % (n - 1 - low);
        edges[high * MAX_AGGREGATIONS + low] = true;

        let mut fields = random_dag(n, &edges, &inputs, seed);
        let low_id = format!("agg{low}");
        let high_id = format!("agg{high}");
        for field in &mut fields {
            if field.id == low_id {
                let mut sources = field.aggregation().expect("aggregation").sources().to_vec();
                sources.push(high_id.clone());
                *field = FieldDef::summation(field.id.clone(), field.title.clone(), sources);
            }
        }

        match build_plan(schema(fields.clone())) {
            Err(SchemaError::CyclicDependency { aggregation }) => {
                prop_assert!(reaches_itself(&fields, &aggregation), "{} is not on a cycle", aggregation);
            }
            other => prop_assert!(false, "expected cycle error, got {:?}", other.map(|p| p.order().to_vec())),
        }
    }
}
