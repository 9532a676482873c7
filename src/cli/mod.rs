//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{EvalCommand, InspectCommand, ValidateCommand};
use std::ffi::OsString;

/// Workflow step trees and condition expressions
#[derive(Debug, Parser, Clone)]
#[command(name = "orcaloop")]
#[command(author = "orcaloop contributors")]
#[command(version = "0.1.0")]
#[command(
    about = "Validate workflow step trees and evaluate condition expressions",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Validate a workflow document
    Validate(ValidateCommand),

    /// Evaluate a condition against a context
    Eval(EvalCommand),

    /// Print a workflow's step tree
    Inspect(InspectCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
