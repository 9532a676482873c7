//! CLI output formatting

use crate::core::step::{Step, StepKind};
use crate::core::state::StepStatus;
use crate::expression::ConditionError;
use crate::validation::ValidationErrors;
use console::Emoji;
use std::fmt::Write;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");

/// Format a step status for display
pub fn format_status(status: StepStatus) -> String {
    let label = status.as_str().to_uppercase();
    match status {
        StepStatus::Unknown | StepStatus::Pending | StepStatus::Skipped => {
            style(label).dim().to_string()
        }
        StepStatus::Running => style(label).yellow().to_string(),
        StepStatus::Completed => style(label).green().to_string(),
        StepStatus::Failed => style(label).red().to_string(),
    }
}

/// Format every validation error, one per line
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut out = String::new();
    for error in errors {
        let _ = write!(out, "  {} {}", CROSS, style(&error.path).dim());
        if let Some(id) = &error.step_id {
            let _ = write!(out, " ({})", style(id).cyan());
        }
        let _ = writeln!(out, ": {}", style(&error.kind).red());
    }
    out
}

/// Format the outcome of evaluating a condition
pub fn format_eval_result(condition: &str, result: &Result<bool, ConditionError>) -> String {
    match result {
        Ok(true) => format!("{} {} => {}", CHECK, style(condition).bold(), style("true").green()),
        Ok(false) => format!("{} {} => {}", CROSS, style(condition).bold(), style("false").red()),
        Err(e) => format!("{} {}: {}", WARN, style(condition).bold(), style(e).red()),
    }
}

/// One-line summary of a step, without its children
pub fn format_step_line(step: &Step) -> String {
    let id = if step.id.is_empty() {
        style("<anonymous>".to_string()).dim()
    } else {
        style(step.id.clone()).bold()
    };

    let detail = match &step.kind {
        StepKind::Action(action) => {
            let mut detail = format!("action {}", style(&action.name).cyan());
            if !action.parameters.is_empty() {
                let _ = write!(detail, " ({} params)", action.parameters.len());
            }
            detail
        }
        StepKind::Parallel(parallel) => format!("parallel x{}", parallel.steps.len()),
        StepKind::If(if_step) => format!(
            "if ({} else-if{})",
            if_step.else_ifs.len(),
            if if_step.else_branch.is_some() { ", else" } else { "" }
        ),
        StepKind::Switch(switch) => format!("switch on {}", style(&switch.variable).cyan()),
        StepKind::ForLoop(for_loop) => {
            let source = if for_loop.items_var.is_empty() {
                format!("[{} items]", for_loop.items.len())
            } else {
                style(&for_loop.items_var).cyan().to_string()
            };
            let var = if for_loop.loop_var.is_empty() {
                &for_loop.index_var
            } else {
                &for_loop.loop_var
            };
            format!("for {} in {}", var, source)
        }
    };

    let mut line = format!("{} {}", id, detail);
    if step.skip {
        let _ = write!(line, " {}", style("[skip]").yellow());
    }
    line
}

/// Render a step forest as an indented tree, labelling each branch
pub fn format_step_tree(steps: &[Step]) -> String {
    let mut out = String::new();
    write_steps(&mut out, steps, 1);
    out
}

fn write_steps(out: &mut String, steps: &[Step], depth: usize) {
    for step in steps {
        let _ = writeln!(out, "{}{}", indent(depth), format_step_line(step));
        write_branches(out, step, depth + 1);
    }
}

fn write_branches(out: &mut String, step: &Step, depth: usize) {
    match &step.kind {
        StepKind::Action(_) => {}
        StepKind::Parallel(parallel) => write_steps(out, &parallel.steps, depth),
        StepKind::ForLoop(for_loop) => write_steps(out, &for_loop.steps, depth),
        StepKind::If(if_step) => {
            write_label(out, depth, &format!("if {}", if_step.condition));
            write_steps(out, &if_step.steps, depth + 1);
            for else_if in &if_step.else_ifs {
                write_label(out, depth, &format!("else if {}", else_if.condition));
                write_steps(out, &else_if.steps, depth + 1);
            }
            if let Some(else_branch) = &if_step.else_branch {
                write_label(out, depth, "else");
                write_steps(out, &else_branch.steps, depth + 1);
            }
        }
        StepKind::Switch(switch) => {
            for case in &switch.cases {
                let label = match (&case.value, case.default) {
                    (_, true) => "default".to_string(),
                    (Some(value), false) => format!("case {}", value),
                    (None, false) => "case ?".to_string(),
                };
                write_label(out, depth, &label);
                write_steps(out, &case.steps, depth + 1);
            }
        }
    }
}

fn write_label(out: &mut String, depth: usize, label: &str) {
    let _ = writeln!(out, "{}{}", indent(depth), style(label).dim());
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}
