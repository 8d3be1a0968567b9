//! Resolution of a decoded selection into an ordered operation list.
//!
//! Categories run in ascending order. Each one first contributes its own
//! stage operation(s) and then hands its output on: to the value of the
//! category directly after it when that exact category was selected, or to the
//! final output directory otherwise.

use crate::config::StagingConfig;
use crate::error::{DfgError, Result};
use crate::paths;
use crate::peek;
use crate::selection::{Action, ActionTable};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Pipeline stage selected by a category index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Build,
    Merge,
    FinalMerge,
    Cleanup,
}

impl Stage {
    pub fn all() -> &'static [Stage] {
        &[Stage::Build, Stage::Merge, Stage::FinalMerge, Stage::Cleanup]
    }

    pub fn category(self) -> u8 {
        self as u8
    }

    pub fn from_category(category: u8) -> Option<Stage> {
        Stage::all().get(usize::from(category)).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Build => "build",
            Stage::Merge => "merge",
            Stage::FinalMerge => "final_merge",
            Stage::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Build,
    Merge,
    FinalMerge,
    Cleanup,
    Copy,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Build => "build",
            OperationKind::Merge => "merge",
            OperationKind::FinalMerge => "finalMerge",
            OperationKind::Cleanup => "cleanup",
            OperationKind::Copy => "copy",
        }
    }
}

impl From<Stage> for OperationKind {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Build => OperationKind::Build,
            Stage::Merge => OperationKind::Merge,
            Stage::FinalMerge => OperationKind::FinalMerge,
            Stage::Cleanup => OperationKind::Cleanup,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step for the executor. For stage operations `source` is the module
/// whose script runs and `args` are passed to it; copies carry no args.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub kind: OperationKind,
    pub source: String,
    pub destination: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl Operation {
    fn stage(stage: Stage, source: &str, destination: String, args: Vec<String>) -> Self {
        Self {
            kind: stage.into(),
            source: source.to_string(),
            destination,
            args,
        }
    }

    pub fn copy(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::Copy,
            source: source.into(),
            destination: destination.into(),
            args: Vec::new(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.kind, self.source, self.destination)?;
        if !self.args.is_empty() {
            write!(f, " [{}]", self.args.join(", "))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve `table` into the ordered operations that build the selection.
pub fn resolve(table: &ActionTable, staging: &StagingConfig) -> Result<Vec<Operation>> {
    let entries = table.entries();
    let mut ops = Vec::new();

    for (&category, action) in entries {
        let stage = Stage::from_category(category).ok_or_else(|| {
            DfgError::Validation(format!(
                "category {category} ({action}) has no pipeline stage"
            ))
        })?;

        let destination = match peek::successor(entries, category) {
            Some(next) => next.to_string(),
            None => staging.final_path.clone(),
        };

        match stage {
            Stage::Build => {
                // Each selection is built and handed on independently.
                for path in action.paths() {
                    let build = stage_op(stage, path, table, staging)?;
                    let artifact = build.destination.clone();
                    ops.push(build);
                    ops.push(Operation::copy(artifact, destination.as_str()));
                }
            }
            Stage::Merge | Stage::FinalMerge | Stage::Cleanup => {
                let path = single(action, category)?;
                ops.push(stage_op(stage, path, table, staging)?);
                ops.push(Operation::copy(
                    format!("{path}/{}", staging.handoff_name),
                    destination,
                ));
            }
        }
    }

    tracing::debug!(operations = ops.len(), "resolved selection");
    Ok(ops)
}

fn build_op(path: &str, staging: &StagingConfig) -> Result<Operation> {
    let prefix = leading(path)?;
    let temp_name = format!("{prefix}docker");
    let final_name = format!("{prefix}final");
    Ok(Operation::stage(
        Stage::Build,
        path,
        format!("{path}/{final_name}"),
        vec![
            temp_name,
            final_name,
            staging.temp_path.clone(),
            staging.config_path.clone(),
        ],
    ))
}

fn stage_op(
    stage: Stage,
    path: &str,
    table: &ActionTable,
    staging: &StagingConfig,
) -> Result<Operation> {
    let merge = &staging.merge_folder;
    let op = match stage {
        Stage::Build => build_op(path, staging)?,
        Stage::Merge => Operation::stage(stage, path, merge.clone(), vec![merge.clone()]),
        Stage::FinalMerge => {
            let prefix = leading(path)?;
            let area = format!("{merge}{prefix}");
            Operation::stage(
                stage,
                path,
                area.clone(),
                vec![
                    merge.clone(),
                    area,
                    format!("{prefix}docker"),
                    staging.temp_path.clone(),
                    staging.config_path.clone(),
                ],
            )
        }
        Stage::Cleanup => {
            let category = stage.category();
            let previous = peek::predecessor(table.entries(), category).ok_or_else(|| {
                DfgError::Validation(format!(
                    "cleanup selection '{path}' needs a category {} selection to clean up after",
                    category - 1
                ))
            })?;
            let target = leading(single(previous, category - 1)?)?.to_string();
            Operation::stage(stage, path, target.clone(), vec![target])
        }
    };
    Ok(op)
}

fn single(action: &Action, category: u8) -> Result<&str> {
    match action.paths() {
        [path] => Ok(path.as_str()),
        _ => Err(DfgError::Validation(format!(
            "category {category} takes exactly one selection, got '{action}'"
        ))),
    }
}

fn leading(path: &str) -> Result<&str> {
    paths::leading_segment(path).ok_or_else(|| {
        DfgError::Validation(format!("selection '{path}' has no leading path segment"))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
