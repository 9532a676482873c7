//! Test: Structural validation of whole workflows

use crate::helpers::*;
use orcaloop::core::step::StepKind;
use orcaloop::{validate, validate_inputs, ActionSpec, Value, ValidationErrorKind};

#[test]
fn test_fixture_workflow_is_valid() {
    let workflow = load_fixture("order_fulfillment.yaml");
    if let Err(errors) = workflow.validate() {
        panic!("order_fulfillment should be valid:\n{}", errors);
    }
}

/// An empty `if` condition is reported against the If step's id
#[test]
fn test_empty_if_condition_names_step() {
    let workflow = workflow("Gate", vec![if_step("gate", "", vec![action("go")])]);

    let errors = validate(&workflow).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_step_error(&errors, "gate", &ValidationErrorKind::MissingCondition("if"));
    assert!(errors.to_string().contains("gate"));
}

#[test]
fn test_workflow_without_steps() {
    let workflow = workflow("Empty", vec![]);

    let errors = validate(&workflow).unwrap_err();
    let error = errors.iter().next().unwrap();
    assert_eq!(error.kind, ValidationErrorKind::MissingWorkflowSteps);
    assert_eq!(error.path, "workflow");
    assert!(error.step_id.is_none());
}

/// Every defect in the tree is reported in one pass
#[test]
fn test_all_errors_reported_at_once() {
    let workflow = load_fixture("broken_structure.yaml");
    let errors = workflow.validate().unwrap_err();

    let reported: Vec<(String, ValidationErrorKind)> = errors
        .iter()
        .map(|e| (e.path.clone(), e.kind.clone()))
        .collect();

    assert_eq!(
        reported,
        vec![
            ("steps[0].if".to_string(), ValidationErrorKind::MissingCondition("if")),
            ("steps[0].if.else".to_string(), ValidationErrorKind::MissingSteps("else")),
            ("steps[1].parallel".to_string(), ValidationErrorKind::MissingSteps("parallel")),
            ("steps[2].for".to_string(), ValidationErrorKind::MissingItemsSource),
            (
                "steps[2].for.steps[0]".to_string(),
                ValidationErrorKind::DuplicateStepId {
                    id: "inner".to_string(),
                    first_path: "steps[0].if.steps[0]".to_string()
                }
            ),
            ("steps[3].switch".to_string(), ValidationErrorKind::MissingSwitchVariable),
            ("steps[3].switch.cases[0]".to_string(), ValidationErrorKind::MissingCaseValue),
        ]
    );
}

/// An action that names its operation only through `id` is valid
#[test]
fn test_action_without_name_is_valid() {
    let workflow = orcaloop::parse_workflow_yaml(
        r#"
name: Notify
steps:
  - id: s1
    type: Action
    action:
      id: send_email
      parameters:
        - name: to
          var: customer_email
"#,
    )
    .unwrap();

    let StepKind::Action(send) = &workflow.steps[0].kind else {
        panic!("s1 should be an Action step");
    };
    assert_eq!(send.id, "send_email");
    assert!(send.name.is_empty());
}

#[test]
fn test_invalid_condition_syntax_in_else_if() {
    let workflow = workflow(
        "Syntax",
        vec![if_chain(
            "check",
            "x == 1",
            vec![action("a")],
            vec![("x == 2)", vec![action("b")])],
            None,
        )],
    );

    let errors = validate(&workflow).unwrap_err();
    assert_eq!(errors.len(), 1);
    let error = errors.iter().next().unwrap();
    assert_eq!(error.path, "steps[0].if.else_ifs[0]");
    assert!(matches!(
        error.kind,
        ValidationErrorKind::InvalidCondition { block: "else-if", .. }
    ));
}

/// Default cases may omit a value; every case still needs steps
#[test]
fn test_switch_default_without_value_is_valid() {
    let workflow = workflow(
        "Switch",
        vec![switch(
            "route",
            "region",
            vec![
                case("eu", vec![action("vat")]),
                case(Value::from(2), vec![action("two")]),
                default_case(vec![action("fallback")]),
            ],
        )],
    );
    assert!(validate(&workflow).is_ok());

    let empty_default = workflow_with_empty_default();
    let errors = validate(&empty_default).unwrap_err();
    assert_step_error(&errors, "route", &ValidationErrorKind::MissingSteps("case block"));
}

fn workflow_with_empty_default() -> orcaloop::Workflow {
    workflow(
        "Switch",
        vec![switch(
            "route",
            "region",
            vec![case("eu", vec![action("vat")]), default_case(vec![])],
        )],
    )
}

#[test]
fn test_nested_errors_deep_in_tree() {
    let workflow = workflow(
        "Deep",
        vec![parallel(
            "outer",
            vec![for_each(
                "loop",
                "items",
                "item",
                vec![if_step("inner_gate", "ready", vec![parallel("empty", vec![])])],
            )],
        )],
    );

    let errors = validate(&workflow).unwrap_err();
    assert_eq!(errors.len(), 1);
    let error = errors.iter().next().unwrap();
    assert_eq!(error.step_id.as_deref(), Some("empty"));
    assert_eq!(
        error.path,
        "steps[0].parallel.steps[0].for.steps[0].if.steps[0].parallel"
    );
}

/// Loading from disk converts and validates in one call
#[test]
fn test_load_workflow_rejects_broken_fixture() {
    let result = orcaloop::load_workflow(fixture_path("broken_structure.yaml"));
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("failed validation"), "{}", message);
    assert!(message.contains("7 validation errors"), "{}", message);
}

/// Required action inputs are checked against the instance context
#[test]
fn test_required_inputs_checked_against_context() {
    let spec: ActionSpec = serde_yaml::from_str(
        r#"
id: orders.load
parameters:
  - name: orderId
    type: string
    required: true
  - name: includeLines
    type: bool
"#,
    )
    .unwrap();

    let missing = validate_inputs(&spec, &context_with(&[("includeLines", Value::from(true))]))
        .unwrap_err();
    assert_eq!(missing.len(), 1);
    assert_eq!(
        missing.iter().next().unwrap().kind,
        ValidationErrorKind::MissingRequiredInput("orderId".to_string())
    );

    let ready = context_with(&[("orderId", Value::from("A-100"))]);
    assert!(validate_inputs(&spec, &ready).is_ok());
}
