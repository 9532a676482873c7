use anyhow::{Context as _, Result};
use orcaloop::cli::commands::{
    load_context_values, parse_value, EvalCommand, InspectCommand, ValidateCommand,
};
use orcaloop::cli::output::*;
use orcaloop::cli::{Cli, Command};
use orcaloop::core::config::WorkflowDocument;
use orcaloop::core::workflow::{collect_descendants, find_parent};
use orcaloop::{Condition, Context, StepStatus, Workflow};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Validate(cmd) => validate_workflow(cmd)?,
        Command::Eval(cmd) => eval_condition(cmd)?,
        Command::Inspect(cmd) => inspect_workflow(cmd)?,
    }

    Ok(())
}

fn validate_workflow(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating workflow...", INFO);

    let document = WorkflowDocument::from_file(&cmd.file)
        .with_context(|| format!("Failed to load workflow from {}", cmd.file))?;

    // Conversion errors (bad type tags, missing payloads) come first; the
    // structural pass only runs on a document that converted cleanly
    let result = document
        .into_workflow()
        .and_then(|workflow| workflow.validate().map(|_| workflow));

    match result {
        Ok(workflow) => {
            println!("{} Workflow is valid!", CHECK);
            println!("  Name: {}", style(&workflow.name).bold());
            println!("  Version: {}", style(workflow.version).cyan());
            println!("  Top-level steps: {}", style(workflow.steps.len()).cyan());
            println!("  Total steps: {}", style(workflow.iter_steps().count()).cyan());

            if cmd.json {
                let json = serde_json::to_string_pretty(&workflow)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(errors) => {
            println!("{} Validation failed with {} error(s):", CROSS, errors.len());
            print!("{}", format_validation_errors(&errors));
            std::process::exit(1);
        }
    }
}

fn eval_condition(cmd: &EvalCommand) -> Result<()> {
    let instance_id = cmd
        .instance_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let mut context = match &cmd.context {
        Some(path) => Context::wrap(instance_id, load_context_values(path)?),
        None => Context::new(instance_id),
    };

    for (key, raw) in &cmd.vars {
        let value = parse_value(raw);
        println!(
            "{} Variable override: {} = {}",
            INFO,
            style(key).cyan(),
            style(&value).dim()
        );
        context.set(key.clone(), value);
    }
    debug!(instance = %context.id(), variables = context.len(), "Built evaluation context");

    if cmd.show_postfix {
        match Condition::parse(&cmd.condition) {
            Ok(condition) => {
                let postfix: Vec<String> =
                    condition.postfix().iter().map(|t| t.to_string()).collect();
                println!("{} Postfix: {}", INFO, style(postfix.join(" ")).dim());
            }
            Err(e) => println!("{} Postfix unavailable: {}", WARN, e),
        }
    }

    let result = context.evaluate_condition(&cmd.condition);
    println!("{}", format_eval_result(&cmd.condition, &result));

    match result {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(_) => std::process::exit(2),
    }
}

fn inspect_workflow(cmd: &InspectCommand) -> Result<()> {
    let workflow: Workflow = WorkflowDocument::from_file(&cmd.file)?
        .into_workflow()
        .with_context(|| format!("Invalid workflow document {}", cmd.file))?;

    println!(
        "{} {} (version {})",
        INFO,
        style(&workflow.name).bold(),
        workflow.version
    );
    if let Err(errors) = workflow.validate() {
        println!("{} Workflow has {} validation error(s)", WARN, errors.len());
    }

    match &cmd.step {
        None => print!("{}", format_step_tree(&workflow.steps)),
        Some(id) => {
            let step = workflow
                .step(id)
                .with_context(|| format!("Step '{}' not found in workflow", id))?;

            match find_parent(id, &workflow) {
                Some(parent) => println!("  Parent: {}", format_step_line(parent)),
                None => println!("  Parent: {}", style("<workflow>").dim()),
            }
            println!("  Status: {}", format_status(StepStatus::initial(step)));
            print!("{}", format_step_tree(std::slice::from_ref(step)));

            let descendants = collect_descendants(step);
            println!("  Descendants: {}", style(descendants.len()).cyan());
        }
    }

    Ok(())
}
