//! Test utility functions for orcaloop

#![allow(dead_code)]

use orcaloop::core::config::WorkflowDocument;
use orcaloop::core::step::{
    ActionStep, Case, ElseBranch, ElseIf, ForLoopStep, IfStep, ParallelStep, Step, SwitchStep,
};
use orcaloop::{Context, EvalError, Value, ValidationErrorKind, ValidationErrors, Workflow};
use std::path::PathBuf;

/// Path to a file under `tests/fixtures`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load a fixture document and convert it, without structural validation
pub fn load_fixture(name: &str) -> Workflow {
    WorkflowDocument::from_file(fixture_path(name))
        .unwrap_or_else(|e| panic!("fixture {} should parse: {:#}", name, e))
        .into_workflow()
        .unwrap_or_else(|e| panic!("fixture {} should convert: {}", name, e))
}

/// Build a context from key/value pairs
pub fn context_with(values: &[(&str, Value)]) -> Context {
    let mut context = Context::new("test-instance");
    for (key, value) in values {
        context.set(*key, value.clone());
    }
    context
}

/// Action step whose action name matches its id
pub fn action(id: &str) -> Step {
    Step::new(
        id,
        ActionStep {
            id: id.to_string(),
            name: id.to_string(),
            ..Default::default()
        },
    )
}

pub fn parallel(id: &str, steps: Vec<Step>) -> Step {
    Step::new(id, ParallelStep { steps })
}

pub fn if_step(id: &str, condition: &str, steps: Vec<Step>) -> Step {
    Step::new(
        id,
        IfStep {
            condition: condition.to_string(),
            steps,
            ..Default::default()
        },
    )
}

/// If step with else-if branches and an optional else branch
pub fn if_chain(
    id: &str,
    condition: &str,
    steps: Vec<Step>,
    else_ifs: Vec<(&str, Vec<Step>)>,
    else_steps: Option<Vec<Step>>,
) -> Step {
    Step::new(
        id,
        IfStep {
            condition: condition.to_string(),
            steps,
            else_ifs: else_ifs
                .into_iter()
                .map(|(condition, steps)| ElseIf {
                    condition: condition.to_string(),
                    steps,
                })
                .collect(),
            else_branch: else_steps.map(|steps| ElseBranch { steps }),
        },
    )
}

pub fn case(value: impl Into<Value>, steps: Vec<Step>) -> Case {
    Case {
        value: Some(value.into()),
        default: false,
        steps,
    }
}

pub fn default_case(steps: Vec<Step>) -> Case {
    Case {
        value: None,
        default: true,
        steps,
    }
}

pub fn switch(id: &str, variable: &str, cases: Vec<Case>) -> Step {
    Step::new(
        id,
        SwitchStep {
            variable: variable.to_string(),
            cases,
        },
    )
}

pub fn for_each(id: &str, items_var: &str, loop_var: &str, steps: Vec<Step>) -> Step {
    Step::new(
        id,
        ForLoopStep {
            loop_var: loop_var.to_string(),
            items_var: items_var.to_string(),
            steps,
            ..Default::default()
        },
    )
}

pub fn workflow(name: &str, steps: Vec<Step>) -> Workflow {
    Workflow {
        id: format!("wf-{}", name.to_lowercase().replace(' ', "-")),
        name: name.to_string(),
        version: 1,
        description: String::new(),
        steps,
    }
}

/// Ids of a list of steps, in order
pub fn ids(steps: &[&Step]) -> Vec<String> {
    steps.iter().map(|s| s.id.clone()).collect()
}

/// Assert a condition evaluates to the expected boolean
pub fn assert_condition(condition: &str, context: &Context, expected: bool) {
    match context.evaluate_condition(condition) {
        Ok(result) => assert_eq!(
            result, expected,
            "condition `{}` evaluated to {}, expected {}",
            condition, result, expected
        ),
        Err(e) => panic!("condition `{}` failed: {}", condition, e),
    }
}

/// Evaluate a condition that is expected to fail at evaluation time
pub fn eval_error(condition: &str, context: &Context) -> EvalError {
    match context.evaluate_condition(condition) {
        Ok(result) => panic!(
            "condition `{}` unexpectedly evaluated to {}",
            condition, result
        ),
        Err(orcaloop::ConditionError::Eval(e)) => e,
        Err(other) => panic!(
            "condition `{}` failed with a non-evaluation error: {}",
            condition, other
        ),
    }
}

/// Assert validation reported an error of the given kind against the given step id
pub fn assert_step_error(errors: &ValidationErrors, step_id: &str, kind: &ValidationErrorKind) {
    assert!(
        errors.for_step(step_id).any(|e| &e.kind == kind),
        "expected `{}` on step '{}', got:\n{}",
        kind,
        step_id,
        errors
    );
}
