//! CLI command definitions

use crate::core::value::Value;
use anyhow::{Context as _, Result};
use clap::Args;
use std::collections::HashMap;
use std::path::Path;

/// Validate a workflow document
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to workflow YAML or JSON file
    #[arg(short, long)]
    pub file: String,

    /// Print the normalized workflow as JSON
    #[arg(long)]
    pub json: bool,
}

/// Evaluate a condition expression against a context
#[derive(Debug, Args, Clone)]
pub struct EvalCommand {
    /// Condition expression, e.g. `status == "ok" && retries < 3`
    #[arg(short, long)]
    pub condition: String,

    /// YAML or JSON file holding the context variables
    #[arg(long)]
    pub context: Option<String>,

    /// Variable overrides (key=value), applied after the context file
    #[arg(long = "var", value_parser = parse_key_value)]
    pub vars: Vec<(String, String)>,

    /// Instance id for the context (a random one is generated otherwise)
    #[arg(long)]
    pub instance_id: Option<String>,

    /// Print the postfix form of the expression
    #[arg(long)]
    pub show_postfix: bool,
}

/// Print the step tree of a workflow
#[derive(Debug, Args, Clone)]
pub struct InspectCommand {
    /// Path to workflow YAML or JSON file
    #[arg(short, long)]
    pub file: String,

    /// Show only this step and its descendants
    #[arg(long)]
    pub step: Option<String>,
}

/// Parse key=value pairs
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, '=').collect();
    if parts.len() != 2 || parts[0].is_empty() {
        return Err(format!("Invalid key=value pair: {}", s));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// Interpret a `--var` value as a YAML scalar
///
/// `3` becomes a number and `true` a boolean; anything that does not parse,
/// and the empty string, stays a string.
pub fn parse_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    match serde_yaml::from_str::<Value>(raw) {
        Ok(Value::Null) | Err(_) => Value::String(raw.to_string()),
        Ok(value) => value,
    }
}

/// Load context variables from a YAML or JSON mapping
pub fn load_context_values<P: AsRef<Path>>(path: P) -> Result<HashMap<String, Value>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read context file: {}", path.display()))?;

    // JSON is a subset of YAML, one parser covers both
    let values: HashMap<String, Value> = serde_yaml::from_str(&content)
        .with_context(|| format!("Context file must be a mapping: {}", path.display()))?;
    Ok(values)
}
