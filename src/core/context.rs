//! Workflow context - per-instance state that conditions are evaluated against

use crate::core::value::Value;
use crate::expression::{self, ConditionError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Reserved key holding the owning workflow id
pub const WORKFLOW_ID_KEY: &str = "__workflowId__";
/// Reserved key holding the workflow instance id
pub const INSTANCE_ID_KEY: &str = "__instanceId__";
/// Reserved key holding the id of the step currently executing
pub const STEP_ID_KEY: &str = "__stepId__";
/// Reserved key holding the last error message
pub const ERROR_KEY: &str = "__error__";

/// Errors from context access
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContextError {
    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("invalid type for key '{key}': expected {expected}, found {found}")]
    InvalidType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Execution context for one workflow instance
///
/// A flat mapping from keys to [`Value`]s. Reserved bookkeeping entries
/// (instance id, workflow id, current step, last error) live alongside user
/// variables under the `__name__` keys above.
///
/// `clone()` yields a fully independent copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    data: HashMap<String, Value>,
}

impl Context {
    /// Create an empty context for the given instance id
    pub fn new(instance_id: impl Into<String>) -> Self {
        let mut context = Self::default();
        context.set(INSTANCE_ID_KEY, Value::String(instance_id.into()));
        context
    }

    /// Take ownership of an existing map and tag it with the instance id
    pub fn wrap(instance_id: impl Into<String>, values: HashMap<String, Value>) -> Self {
        let mut context = Self { data: values };
        context.set(INSTANCE_ID_KEY, Value::String(instance_id.into()));
        context
    }

    /// Create a context seeded with a copy of `values`
    pub fn from_values<'a, I>(instance_id: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a Value)>,
    {
        let mut context = Self::default();
        for (key, value) in values {
            context.set(key.clone(), value.clone());
        }
        context.set(INSTANCE_ID_KEY, Value::String(instance_id.into()));
        context
    }

    /// Instance id, or an empty string if the reserved entry is missing or not a string
    pub fn id(&self) -> &str {
        self.get_str(INSTANCE_ID_KEY).unwrap_or_default()
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Result<&Value, ContextError> {
        self.data
            .get(key)
            .ok_or_else(|| ContextError::KeyNotFound(key.to_string()))
    }

    /// Get a string value by key
    pub fn get_str(&self, key: &str) -> Result<&str, ContextError> {
        let value = self.get(key)?;
        value.as_str().ok_or_else(|| invalid_type(key, "string", value))
    }

    /// Get a numeric value by key
    pub fn get_f64(&self, key: &str) -> Result<f64, ContextError> {
        let value = self.get(key)?;
        value.as_f64().ok_or_else(|| invalid_type(key, "number", value))
    }

    /// Get a boolean value by key
    pub fn get_bool(&self, key: &str) -> Result<bool, ContextError> {
        let value = self.get(key)?;
        value.as_bool().ok_or_else(|| invalid_type(key, "boolean", value))
    }

    /// Check whether a key is present
    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// All keys, in no particular order
    pub fn keys(&self) -> Vec<&str> {
        self.data.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Set a value, replacing any previous one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    /// Remove a key; missing keys are ignored
    pub fn delete(&mut self, key: &str) {
        self.data.remove(key);
    }

    /// Copy of the underlying map
    pub fn to_map(&self) -> HashMap<String, Value> {
        self.data.clone()
    }

    /// Id of the step currently executing, or an empty string
    pub fn step_id(&self) -> &str {
        self.get_str(STEP_ID_KEY).unwrap_or_default()
    }

    pub fn set_step_id(&mut self, step_id: impl Into<String>) {
        self.set(STEP_ID_KEY, Value::String(step_id.into()));
    }

    /// Id of the owning workflow, or an empty string
    pub fn workflow_id(&self) -> &str {
        self.get_str(WORKFLOW_ID_KEY).unwrap_or_default()
    }

    pub fn set_workflow_id(&mut self, workflow_id: impl Into<String>) {
        self.set(WORKFLOW_ID_KEY, Value::String(workflow_id.into()));
    }

    /// Last recorded error message, or an empty string
    pub fn error(&self) -> &str {
        self.get_str(ERROR_KEY).unwrap_or_default()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.set(ERROR_KEY, Value::String(message.into()));
    }

    /// Copy every entry of `other` into this context (last write wins)
    pub fn merge(&mut self, other: &Context) {
        self.merge_from(&other.data);
    }

    /// Copy every entry of `values` into this context (last write wins)
    pub fn merge_from(&mut self, values: &HashMap<String, Value>) {
        for (key, value) in values {
            self.data.insert(key.clone(), value.clone());
        }
    }

    /// Evaluate a condition expression against this context
    ///
    /// Supports `==`, `!=`, `<`, `>`, `<=`, `>=`, `&&`, `||` and parentheses.
    pub fn evaluate_condition(&self, condition: &str) -> Result<bool, ConditionError> {
        expression::evaluate_condition(condition, self)
    }
}

fn invalid_type(key: &str, expected: &'static str, found: &Value) -> ContextError {
    ContextError::InvalidType {
        key: key.to_string(),
        expected,
        found: found.type_name(),
    }
}
