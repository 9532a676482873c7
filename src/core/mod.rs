//! Core domain models for orcaloop
//!
//! This module defines the data structures that describe workflows: dynamic
//! values, the execution context, the step tree and its document form.

pub mod action;
pub mod condition;
pub mod config;
pub mod context;
pub mod state;
pub mod step;
pub mod value;
pub mod workflow;

pub use action::{ActionSpec, FieldType, Schema};
pub use condition::Condition;
pub use context::*;
pub use state::*;
pub use step::*;
pub use value::Value;
pub use workflow::*;
