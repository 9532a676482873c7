//! Structural checks over a workflow's step tree

use crate::core::condition::Condition;
use crate::core::step::{Step, StepKind};
use crate::core::workflow::Workflow;
use crate::validation::error::{ValidationError, ValidationErrorKind, ValidationErrors};
use std::collections::HashMap;
use tracing::debug;

/// Validate a workflow and its entire step tree
///
/// Every defect is reported in one pass: a broken branch does not stop the
/// validator from descending into its siblings or its own children.
pub fn validate(workflow: &Workflow) -> Result<(), ValidationErrors> {
    let mut validator = Validator::default();

    if workflow.name.is_empty() {
        validator.push(ValidationError::workflow(ValidationErrorKind::MissingWorkflowName));
    }
    if workflow.steps.is_empty() {
        validator.push(ValidationError::workflow(ValidationErrorKind::MissingWorkflowSteps));
    }
    validator.check_steps(&workflow.steps, "steps");

    debug!(
        workflow = %workflow.name,
        errors = validator.errors.len(),
        "Validated workflow"
    );
    validator.finish()
}

/// Validate a single step subtree, outside of any workflow
pub fn validate_step(step: &Step) -> Result<(), ValidationErrors> {
    let mut validator = Validator::default();
    let path = if step.id.is_empty() { "step" } else { step.id.as_str() };
    validator.check_step(step, path);
    validator.finish()
}

#[derive(Default)]
struct Validator {
    errors: Vec<ValidationError>,
    /// Non-empty step id -> path where it was first seen
    seen_ids: HashMap<String, String>,
}

impl Validator {
    fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    fn step_error(&mut self, path: &str, step: &Step, kind: ValidationErrorKind) {
        self.push(ValidationError::step(path, &step.id, kind));
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        match ValidationErrors::from_vec(self.errors) {
            Some(errors) => Err(errors),
            None => Ok(()),
        }
    }

    fn check_steps(&mut self, steps: &[Step], path: &str) {
        for (i, step) in steps.iter().enumerate() {
            self.check_step(step, &format!("{}[{}]", path, i));
        }
    }

    /// Report an empty step list for `block`, otherwise recurse into it
    fn check_branch(&mut self, step: &Step, steps: &[Step], path: &str, block: &'static str) {
        if steps.is_empty() {
            self.step_error(path, step, ValidationErrorKind::MissingSteps(block));
        } else {
            self.check_steps(steps, &format!("{}.steps", path));
        }
    }

    fn check_condition(&mut self, step: &Step, condition: &str, path: &str, block: &'static str) {
        if condition.trim().is_empty() {
            self.step_error(path, step, ValidationErrorKind::MissingCondition(block));
        } else if let Err(source) = Condition::parse(condition) {
            self.step_error(path, step, ValidationErrorKind::InvalidCondition { block, source });
        }
    }

    fn check_step(&mut self, step: &Step, path: &str) {
        if !step.id.is_empty() {
            if let Some(first_path) = self.seen_ids.get(&step.id) {
                let kind = ValidationErrorKind::DuplicateStepId {
                    id: step.id.clone(),
                    first_path: first_path.clone(),
                };
                self.step_error(path, step, kind);
            } else {
                self.seen_ids.insert(step.id.clone(), path.to_string());
            }
        }

        match &step.kind {
            // Actions are identified by either their id or their name; neither is required
            StepKind::Action(_) => {}
            StepKind::Parallel(parallel) => {
                self.check_branch(step, &parallel.steps, &format!("{}.parallel", path), "parallel");
            }
            StepKind::If(if_step) => {
                let if_path = format!("{}.if", path);
                self.check_condition(step, &if_step.condition, &if_path, "if");
                self.check_branch(step, &if_step.steps, &if_path, "if");

                for (i, else_if) in if_step.else_ifs.iter().enumerate() {
                    let else_if_path = format!("{}.else_ifs[{}]", if_path, i);
                    self.check_condition(step, &else_if.condition, &else_if_path, "else-if");
                    self.check_branch(step, &else_if.steps, &else_if_path, "else-if");
                }

                if let Some(else_branch) = &if_step.else_branch {
                    let else_path = format!("{}.else", if_path);
                    self.check_branch(step, &else_branch.steps, &else_path, "else");
                }
            }
            StepKind::ForLoop(for_loop) => {
                let for_path = format!("{}.for", path);
                match (for_loop.items_var.is_empty(), for_loop.items.is_empty()) {
                    (true, true) => {
                        self.step_error(&for_path, step, ValidationErrorKind::MissingItemsSource)
                    }
                    (false, false) => {
                        self.step_error(&for_path, step, ValidationErrorKind::AmbiguousItemsSource)
                    }
                    _ => {}
                }
                if for_loop.loop_var.is_empty() && for_loop.index_var.is_empty() {
                    self.step_error(&for_path, step, ValidationErrorKind::MissingLoopVariable);
                }
                self.check_branch(step, &for_loop.steps, &for_path, "for-loop");
            }
            StepKind::Switch(switch) => {
                let switch_path = format!("{}.switch", path);
                if switch.variable.is_empty() {
                    self.step_error(&switch_path, step, ValidationErrorKind::MissingSwitchVariable);
                }
                if switch.cases.is_empty() {
                    self.step_error(&switch_path, step, ValidationErrorKind::MissingCases);
                }
                for (i, case) in switch.cases.iter().enumerate() {
                    let case_path = format!("{}.cases[{}]", switch_path, i);
                    // A null case value is indistinguishable from a missing one
                    if !case.default && case.value.as_ref().map_or(true, |v| v.is_null()) {
                        self.step_error(&case_path, step, ValidationErrorKind::MissingCaseValue);
                    }
                    self.check_branch(step, &case.steps, &case_path, "case block");
                }
            }
        }
    }
}
