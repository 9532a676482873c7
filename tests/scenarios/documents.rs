//! Test: Loading and saving workflow documents

use crate::helpers::*;
use orcaloop::core::config::WorkflowDocument;
use orcaloop::core::step::StepKind;
use orcaloop::{Context, Value, ValidationErrorKind, Workflow};

#[test]
fn test_fixture_loads_with_all_fields() {
    let workflow = load_fixture("order_fulfillment.yaml");

    assert_eq!(workflow.id, "wf-order-fulfillment");
    assert_eq!(workflow.version, 3);
    assert_eq!(workflow.steps.len(), 5);

    let StepKind::Action(load) = &workflow.steps[0].kind else {
        panic!("load_order should be an Action step");
    };
    assert_eq!(load.name, "orders.load");
    assert_eq!(load.parameters[0].var, "orderId");
    assert_eq!(load.results.len(), 2);
    assert_eq!(load.results[1].output_var, "lines");
    assert_eq!(load.results[1].pipeline_var, "lineItems");

    let StepKind::Action(cancel) = &workflow.step("cancel").unwrap().kind else {
        panic!("cancel should be an Action step");
    };
    assert_eq!(cancel.parameters[0].value, Some(Value::from("out of stock")));
}

/// Tag and payload mismatches are all reported, with their paths
#[test]
fn test_bad_tags_report_every_mismatch() {
    let errors = WorkflowDocument::from_file(fixture_path("bad_tags.json"))
        .unwrap()
        .into_workflow()
        .unwrap_err();

    assert_eq!(errors.len(), 3);
    assert_step_error(
        &errors,
        "first",
        &ValidationErrorKind::MissingPayload {
            step_type: "Action",
            field: "action",
        },
    );
    assert_step_error(
        &errors,
        "second",
        &ValidationErrorKind::UnknownStepType("While".to_string()),
    );
    let nested = errors.for_step("nested").next().unwrap();
    assert_eq!(nested.path, "steps[2].parallel.steps[0]");
}

/// YAML -> model -> JSON -> model keeps every field
#[test]
fn test_yaml_to_json_round_trip() {
    let workflow = load_fixture("order_fulfillment.yaml");

    let json = serde_json::to_string_pretty(&workflow).unwrap();
    assert!(json.contains("\"else_ifs\""));
    assert!(json.contains("\"pipeline_var\""));
    assert!(json.contains("\"for\""));

    let back: Workflow = serde_json::from_str(&json).unwrap();
    assert_eq!(back, workflow);
}

#[test]
fn test_yaml_round_trip() {
    let workflow = load_fixture("order_fulfillment.yaml");

    let yaml = serde_yaml::to_string(&workflow).unwrap();
    let back: Workflow = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, workflow);
}

/// Deserializing a `Workflow` directly applies the tag checks
#[test]
fn test_direct_deserialize_rejects_bad_tags() {
    let content = std::fs::read_to_string(fixture_path("bad_tags.json")).unwrap();
    let message = serde_json::from_str::<Workflow>(&content)
        .unwrap_err()
        .to_string();
    assert!(message.contains("3 validation errors"), "{}", message);
}

/// Context contents survive a trip through JSON and YAML
#[test]
fn test_context_round_trip() {
    let mut nested = std::collections::HashMap::new();
    nested.insert("city".to_string(), Value::from("Lisbon"));

    let mut ctx = Context::new("instance-7");
    ctx.set_workflow_id("wf-order-fulfillment");
    ctx.set("total", 42.5);
    ctx.set("express", true);
    ctx.set("note", Value::Null);
    ctx.set("lines", vec![Value::from("sku-1"), Value::from(2)]);
    ctx.set("address", nested);

    let json = serde_json::to_string(&ctx).unwrap();
    let from_json: Context = serde_json::from_str(&json).unwrap();
    assert_eq!(from_json, ctx);

    let yaml = serde_yaml::to_string(&ctx).unwrap();
    let from_yaml: Context = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(from_yaml, ctx);
    assert_eq!(from_yaml.id(), "instance-7");
    assert_eq!(from_yaml.workflow_id(), "wf-order-fulfillment");
}

/// JSON written by other producers uses `null` for empty fields; every one
/// of them reads as the field's empty default
#[test]
fn test_null_fields_read_as_defaults() {
    let workflow = load_fixture("null_fields.json");
    assert!(workflow.description.is_empty());

    let StepKind::Action(lookup) = &workflow.step("lookup").unwrap().kind else {
        panic!("lookup should be an Action step");
    };
    assert_eq!(lookup.id, "customers.lookup");
    assert!(lookup.name.is_empty());
    assert!(lookup.results.is_empty());
    assert_eq!(lookup.parameters[0].value, None);
    assert_eq!(lookup.parameters[0].var, "customer");
    assert_eq!(lookup.parameters[1].value, Some(Value::from(5)));
    assert!(lookup.parameters[1].var.is_empty());

    let StepKind::If(tier_check) = &workflow.step("tier_check").unwrap().kind else {
        panic!("tier_check should be an If step");
    };
    assert!(tier_check.else_ifs.is_empty());
    assert!(tier_check.else_branch.is_none());

    let StepKind::Switch(route) = &workflow.step("route").unwrap().kind else {
        panic!("route should be a Switch step");
    };
    assert!(!route.cases[0].default);
    assert_eq!(route.cases[1].value, None);
    assert!(route.cases[1].default);

    let StepKind::ForLoop(each_line) = &workflow.step("each_line").unwrap().kind else {
        panic!("each_line should be a ForLoop step");
    };
    assert!(each_line.items.is_empty());
    assert!(each_line.index_var.is_empty());
    assert_eq!(each_line.items_var, "lines");
}
