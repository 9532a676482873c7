//! Test: Picking branches of the order fulfillment workflow from context

use crate::helpers::*;
use orcaloop::core::step::StepKind;
use orcaloop::{ContextError, StepStatus, Value};
use orcaloop::core::StepChangeEvent;

fn selected_ids(steps: Option<&[orcaloop::Step]>) -> Vec<String> {
    steps
        .unwrap_or_default()
        .iter()
        .map(|s| s.id.clone())
        .collect()
}

/// The first matching condition of an if / else-if / else chain wins
#[test]
fn test_if_chain_selection() {
    let workflow = load_fixture("order_fulfillment.yaml");
    let StepKind::If(stock_check) = &workflow.step("stock_check").unwrap().kind else {
        panic!("stock_check should be an If step");
    };

    let in_stock = context_with(&[
        ("in_stock", Value::from(true)),
        ("total", Value::from(42.5)),
        ("backorder_allowed", Value::from(true)),
    ]);
    assert_eq!(
        selected_ids(stock_check.select_branch(&in_stock).unwrap()),
        vec!["reserve"]
    );

    let backorder = context_with(&[
        ("in_stock", Value::from(false)),
        ("total", Value::from(42.5)),
        ("backorder_allowed", Value::from(true)),
    ]);
    assert_eq!(
        selected_ids(stock_check.select_branch(&backorder).unwrap()),
        vec!["backorder"]
    );

    let cancelled = context_with(&[
        ("in_stock", Value::from(false)),
        ("total", Value::from(0)),
        ("backorder_allowed", Value::from(false)),
    ]);
    assert_eq!(
        selected_ids(stock_check.select_branch(&cancelled).unwrap()),
        vec!["cancel"]
    );
}

/// A failing condition surfaces instead of silently picking another branch
#[test]
fn test_if_selection_propagates_errors() {
    let workflow = load_fixture("order_fulfillment.yaml");
    let StepKind::If(stock_check) = &workflow.step("stock_check").unwrap().kind else {
        panic!("stock_check should be an If step");
    };

    let missing_total = context_with(&[("in_stock", Value::from(true))]);
    assert!(stock_check.select_branch(&missing_total).is_err());
}

#[test]
fn test_switch_selection() {
    let workflow = load_fixture("order_fulfillment.yaml");
    let StepKind::Switch(route) = &workflow.step("route_region").unwrap().kind else {
        panic!("route_region should be a Switch step");
    };

    let eu = context_with(&[("region", Value::from("eu"))]);
    assert_eq!(route.select_case(&eu).unwrap().unwrap().steps[0].id, "apply_vat");

    let us = context_with(&[("region", Value::from("us"))]);
    assert_eq!(route.select_case(&us).unwrap().unwrap().steps[0].id, "apply_sales_tax");

    let other = context_with(&[("region", Value::from("apac"))]);
    let chosen = route.select_case(&other).unwrap().unwrap();
    assert!(chosen.default);
    assert_eq!(Some(chosen), route.default_case());

    let unset = context_with(&[]);
    assert_eq!(
        route.select_case(&unset),
        Err(ContextError::KeyNotFound("region".to_string()))
    );
}

/// Iterating a loop binds the item and index for each body run
#[test]
fn test_for_loop_iteration() {
    let workflow = load_fixture("order_fulfillment.yaml");
    let StepKind::ForLoop(ship_lines) = &workflow.step("ship_lines").unwrap().kind else {
        panic!("ship_lines should be a ForLoop step");
    };

    let mut ctx = context_with(&[(
        "lineItems",
        Value::from(vec![Value::from("sku-1"), Value::from("sku-2")]),
    )]);

    let items = ship_lines.resolve_items(&ctx).unwrap();
    assert_eq!(items.len(), 2);

    let mut seen = Vec::new();
    for (index, item) in items.iter().enumerate() {
        ship_lines.bind_iteration(&mut ctx, index, item);
        seen.push((
            ctx.get_str("line").unwrap().to_string(),
            ctx.get_f64("lineIndex").unwrap(),
        ));
    }
    assert_eq!(
        seen,
        vec![("sku-1".to_string(), 0.0), ("sku-2".to_string(), 1.0)]
    );
}

#[test]
fn test_for_loop_requires_sequence() {
    let workflow = load_fixture("order_fulfillment.yaml");
    let StepKind::ForLoop(ship_lines) = &workflow.step("ship_lines").unwrap().kind else {
        panic!("ship_lines should be a ForLoop step");
    };

    let ctx = context_with(&[("lineItems", Value::from("not a list"))]);
    assert!(matches!(
        ship_lines.resolve_items(&ctx),
        Err(ContextError::InvalidType { expected: "sequence", .. })
    ));
}

/// Parallel children each get an independent clone of the context
#[test]
fn test_parallel_children_get_independent_contexts() {
    let workflow = load_fixture("order_fulfillment.yaml");
    let pack_and_label = workflow.step("pack_and_label").unwrap();

    let parent = context_with(&[("line", Value::from("sku-1"))]);
    let mut branches: Vec<_> = pack_and_label
        .children()
        .map(|child| {
            let mut ctx = parent.clone();
            ctx.set_step_id(child.id.clone());
            ctx
        })
        .collect();

    branches[0].set("packed", true);
    assert!(!branches[1].has("packed"));
    assert!(!parent.has("packed"));

    let mut joined = parent.clone();
    for branch in &branches {
        joined.merge(branch);
    }
    assert!(joined.get_bool("packed").unwrap());

    let event = StepChangeEvent::from_context(&branches[1], StepStatus::Completed);
    assert_eq!(event.step_id, "label");
    assert_eq!(event.instance_id, "test-instance");
}
