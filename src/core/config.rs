//! Workflow documents in YAML / JSON
//!
//! The persisted form tags each step with a `type` string and carries its
//! payload in one optional field. These document types mirror that shape
//! exactly; conversion into [`Workflow`] / [`Step`] checks that the tag and
//! payload agree and reports every mismatch at once.

use crate::core::step::{
    ActionStep, Case, ElseBranch, ElseIf, ForLoopStep, IfStep, ParallelStep, Step, StepKind,
    SwitchStep, STEP_TYPE_ACTION, STEP_TYPE_FOR_LOOP, STEP_TYPE_IF, STEP_TYPE_PARALLEL,
    STEP_TYPE_SWITCH,
};
use crate::core::value::{nullable, Value};
use crate::core::workflow::Workflow;
use crate::validation::{ValidationError, ValidationErrorKind, ValidationErrors};
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Top-level workflow document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,

    #[serde(default, deserialize_with = "nullable")]
    pub name: String,

    #[serde(default, deserialize_with = "nullable")]
    pub version: i64,

    #[serde(default, deserialize_with = "nullable")]
    pub description: String,

    #[serde(default, deserialize_with = "nullable")]
    pub steps: Vec<StepDocument>,
}

/// Step as it appears in a document: a type tag plus optional payloads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepDocument {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,

    #[serde(default, deserialize_with = "nullable")]
    pub skip: bool,

    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub step_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<ParallelDocument>,

    #[serde(rename = "for", default, skip_serializing_if = "Option::is_none")]
    pub for_loop: Option<ForLoopDocument>,

    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub if_block: Option<IfDocument>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch: Option<SwitchDocument>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParallelDocument {
    #[serde(default, deserialize_with = "nullable")]
    pub steps: Vec<StepDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForLoopDocument {
    #[serde(default, deserialize_with = "nullable")]
    pub loop_var: String,

    #[serde(default, deserialize_with = "nullable")]
    pub index_var: String,

    #[serde(default, deserialize_with = "nullable")]
    pub items_var: String,

    #[serde(default, deserialize_with = "nullable")]
    pub items: Vec<Value>,

    #[serde(default, deserialize_with = "nullable")]
    pub steps: Vec<StepDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IfDocument {
    #[serde(default, deserialize_with = "nullable")]
    pub condition: String,

    #[serde(default, deserialize_with = "nullable")]
    pub steps: Vec<StepDocument>,

    #[serde(default, deserialize_with = "nullable")]
    pub else_ifs: Vec<ElseIfDocument>,

    #[serde(rename = "else", default, skip_serializing_if = "Option::is_none")]
    pub else_branch: Option<ElseDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElseIfDocument {
    #[serde(default, deserialize_with = "nullable")]
    pub condition: String,

    #[serde(default, deserialize_with = "nullable")]
    pub steps: Vec<StepDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElseDocument {
    #[serde(default, deserialize_with = "nullable")]
    pub steps: Vec<StepDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchDocument {
    #[serde(default, deserialize_with = "nullable")]
    pub variable: String,

    #[serde(default, deserialize_with = "nullable")]
    pub cases: Vec<CaseDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseDocument {
    /// `null` and absent both mean "no value"
    #[serde(default)]
    pub value: Option<Value>,

    #[serde(default, deserialize_with = "nullable")]
    pub default: bool,

    #[serde(default, deserialize_with = "nullable")]
    pub steps: Vec<StepDocument>,
}

impl WorkflowDocument {
    /// Load a workflow document; `.json` files are read as JSON, anything else as YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read workflow file {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse workflow YAML")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse workflow JSON")
    }

    /// Convert into the typed model, collecting every tag/payload error
    pub fn into_workflow(self) -> std::result::Result<Workflow, ValidationErrors> {
        let mut errors = Vec::new();
        let steps = convert_steps(self.steps, "steps", &mut errors);

        if let Some(errors) = ValidationErrors::from_vec(errors) {
            return Err(errors);
        }

        Ok(Workflow {
            id: self.id,
            name: self.name,
            version: self.version,
            description: self.description,
            steps,
        })
    }
}

impl From<Workflow> for WorkflowDocument {
    fn from(workflow: Workflow) -> Self {
        Self {
            id: workflow.id,
            name: workflow.name,
            version: workflow.version,
            description: workflow.description,
            steps: workflow.steps.into_iter().map(StepDocument::from).collect(),
        }
    }
}

impl TryFrom<WorkflowDocument> for Workflow {
    type Error = ValidationErrors;

    fn try_from(document: WorkflowDocument) -> std::result::Result<Self, Self::Error> {
        document.into_workflow()
    }
}

/// Load, convert and validate a workflow file
pub fn load_workflow<P: AsRef<Path>>(path: P) -> Result<Workflow> {
    let path = path.as_ref();
    let workflow = WorkflowDocument::from_file(path)?
        .into_workflow()
        .with_context(|| format!("Invalid workflow document {}", path.display()))?;
    workflow
        .validate()
        .with_context(|| format!("Workflow '{}' failed validation", workflow.name))?;
    debug!(workflow = %workflow.name, steps = workflow.steps.len(), "Loaded workflow");
    Ok(workflow)
}

/// Parse, convert and validate a YAML workflow
pub fn parse_workflow_yaml(yaml: &str) -> Result<Workflow> {
    let workflow = WorkflowDocument::from_yaml(yaml)?.into_workflow()?;
    workflow.validate()?;
    Ok(workflow)
}

fn convert_steps(
    documents: Vec<StepDocument>,
    path: &str,
    errors: &mut Vec<ValidationError>,
) -> Vec<Step> {
    documents
        .into_iter()
        .enumerate()
        .filter_map(|(i, document)| document.convert(&format!("{}[{}]", path, i), errors))
        .collect()
}

impl StepDocument {
    fn payload_count(&self) -> usize {
        [
            self.parallel.is_some(),
            self.for_loop.is_some(),
            self.if_block.is_some(),
            self.switch.is_some(),
            self.action.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    fn convert(self, path: &str, errors: &mut Vec<ValidationError>) -> Option<Step> {
        if self.payload_count() > 1 {
            warn!(
                step = %self.id,
                step_type = %self.step_type,
                "Step carries more than one payload; only the one matching its type is used"
            );
        }

        let missing = |step_type: &'static str, field: &'static str| {
            ValidationError::step(
                path,
                &self.id,
                ValidationErrorKind::MissingPayload { step_type, field },
            )
        };

        let kind = match self.step_type.as_str() {
            STEP_TYPE_ACTION => match self.action {
                Some(action) => StepKind::Action(action),
                None => {
                    errors.push(missing(STEP_TYPE_ACTION, "action"));
                    return None;
                }
            },
            STEP_TYPE_PARALLEL => match self.parallel {
                Some(parallel) => {
                    let steps_path = format!("{}.parallel.steps", path);
                    StepKind::Parallel(ParallelStep {
                        steps: convert_steps(parallel.steps, &steps_path, errors),
                    })
                }
                None => {
                    errors.push(missing(STEP_TYPE_PARALLEL, "parallel"));
                    return None;
                }
            },
            STEP_TYPE_IF => match self.if_block {
                Some(if_block) => StepKind::If(convert_if(if_block, path, errors)),
                None => {
                    errors.push(missing(STEP_TYPE_IF, "if"));
                    return None;
                }
            },
            STEP_TYPE_SWITCH => match self.switch {
                Some(switch) => StepKind::Switch(SwitchStep {
                    variable: switch.variable,
                    cases: switch
                        .cases
                        .into_iter()
                        .enumerate()
                        .map(|(i, case)| Case {
                            value: case.value,
                            default: case.default,
                            steps: convert_steps(
                                case.steps,
                                &format!("{}.switch.cases[{}].steps", path, i),
                                errors,
                            ),
                        })
                        .collect(),
                }),
                None => {
                    errors.push(missing(STEP_TYPE_SWITCH, "switch"));
                    return None;
                }
            },
            STEP_TYPE_FOR_LOOP => match self.for_loop {
                Some(for_loop) => StepKind::ForLoop(ForLoopStep {
                    loop_var: for_loop.loop_var,
                    index_var: for_loop.index_var,
                    items_var: for_loop.items_var,
                    items: for_loop.items,
                    steps: convert_steps(for_loop.steps, &format!("{}.for.steps", path), errors),
                }),
                None => {
                    errors.push(missing(STEP_TYPE_FOR_LOOP, "for"));
                    return None;
                }
            },
            other => {
                errors.push(ValidationError::step(
                    path,
                    &self.id,
                    ValidationErrorKind::UnknownStepType(other.to_string()),
                ));
                return None;
            }
        };

        Some(Step {
            id: self.id,
            skip: self.skip,
            kind,
        })
    }
}

fn convert_if(document: IfDocument, path: &str, errors: &mut Vec<ValidationError>) -> IfStep {
    IfStep {
        condition: document.condition,
        steps: convert_steps(document.steps, &format!("{}.if.steps", path), errors),
        else_ifs: document
            .else_ifs
            .into_iter()
            .enumerate()
            .map(|(i, else_if)| ElseIf {
                condition: else_if.condition,
                steps: convert_steps(
                    else_if.steps,
                    &format!("{}.if.else_ifs[{}].steps", path, i),
                    errors,
                ),
            })
            .collect(),
        else_branch: document.else_branch.map(|else_branch| ElseBranch {
            steps: convert_steps(else_branch.steps, &format!("{}.if.else.steps", path), errors),
        }),
    }
}

impl TryFrom<StepDocument> for Step {
    type Error = ValidationErrors;

    fn try_from(document: StepDocument) -> std::result::Result<Self, Self::Error> {
        let mut errors = Vec::new();
        let path = if document.id.is_empty() {
            "step".to_string()
        } else {
            document.id.clone()
        };
        let step = document.convert(&path, &mut errors);

        match step {
            Some(step) if errors.is_empty() => Ok(step),
            _ => Err(ValidationErrors::new(errors)),
        }
    }
}

impl From<Step> for StepDocument {
    fn from(step: Step) -> Self {
        let mut document = StepDocument {
            id: step.id,
            skip: step.skip,
            step_type: step.kind.type_name().to_string(),
            ..Default::default()
        };

        match step.kind {
            StepKind::Action(action) => document.action = Some(action),
            StepKind::Parallel(parallel) => {
                document.parallel = Some(ParallelDocument {
                    steps: into_documents(parallel.steps),
                })
            }
            StepKind::If(if_step) => {
                document.if_block = Some(IfDocument {
                    condition: if_step.condition,
                    steps: into_documents(if_step.steps),
                    else_ifs: if_step
                        .else_ifs
                        .into_iter()
                        .map(|else_if| ElseIfDocument {
                            condition: else_if.condition,
                            steps: into_documents(else_if.steps),
                        })
                        .collect(),
                    else_branch: if_step.else_branch.map(|else_branch| ElseDocument {
                        steps: into_documents(else_branch.steps),
                    }),
                })
            }
            StepKind::Switch(switch) => {
                document.switch = Some(SwitchDocument {
                    variable: switch.variable,
                    cases: switch
                        .cases
                        .into_iter()
                        .map(|case| CaseDocument {
                            value: case.value,
                            default: case.default,
                            steps: into_documents(case.steps),
                        })
                        .collect(),
                })
            }
            StepKind::ForLoop(for_loop) => {
                document.for_loop = Some(ForLoopDocument {
                    loop_var: for_loop.loop_var,
                    index_var: for_loop.index_var,
                    items_var: for_loop.items_var,
                    items: for_loop.items,
                    steps: into_documents(for_loop.steps),
                })
            }
        }

        document
    }
}

fn into_documents(steps: Vec<Step>) -> Vec<StepDocument> {
    steps.into_iter().map(StepDocument::from).collect()
}
