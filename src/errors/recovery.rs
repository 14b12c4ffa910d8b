// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Error recovery suggestions
//!
//! Provides actionable follow-ups for the errors the CLI reports.

use super::PipeweaveError;

/// A recovery suggestion with concrete steps
#[derive(Debug, Clone)]
pub struct RecoverySuggestion {
    /// Brief description of what to do
    pub action: String,
    /// Detailed steps
    pub steps: Vec<String>,
    /// Commands to run
    pub commands: Vec<String>,
}

impl RecoverySuggestion {
    /// Pick a suggestion for an error, if there is a useful one
    pub fn for_error(error: &PipeweaveError) -> Option<Self> {
        match error {
            PipeweaveError::NoInputFiles { pattern } => Some(Self::fix_missing_inputs(pattern)),
            PipeweaveError::NoRenderer { kind, .. } => Some(Self::use_supported_root(kind)),
            PipeweaveError::ExpansionDepthExceeded { rule, limit } => {
                Some(Self::break_macro_cycle(rule, *limit))
            }
            // Behavior is the only thing checked on a step
            PipeweaveError::Validation { entity, .. } if entity.starts_with("step ") => {
                Some(Self::pick_step_behavior())
            }
            _ => None,
        }
    }

    /// Suggest fixing missing input files
    pub fn fix_missing_inputs(pattern: &str) -> Self {
        Self {
            action: format!("Add files matching pattern '{}'", pattern),
            steps: vec![
                "Patterns are resolved relative to the working directory".into(),
                "Either create the files or update the pattern".into(),
            ],
            commands: vec![
                "# List files that would match:".into(),
                format!("ls -la {}", pattern.replace('*', "\\*")),
            ],
        }
    }

    /// Suggest switching to a supported root kind
    pub fn use_supported_root(kind: &str) -> Self {
        Self {
            action: format!("Replace root kind '{}'", kind),
            steps: vec![
                "The document root must be a platform root node".into(),
                "Use 'github.workflow' or 'azure.pipeline'".into(),
            ],
            commands: vec![
                "# Show registered platforms:".into(),
                "pipeweave platforms".into(),
            ],
        }
    }

    /// Suggest breaking a self-referencing macro
    pub fn break_macro_cycle(rule: &str, limit: usize) -> Self {
        Self {
            action: format!("Check macro '{}' for self-reference", rule),
            steps: vec![
                format!("Expansion went deeper than {} levels", limit),
                "A macro whose body uses itself never reaches a job or step".into(),
            ],
            commands: vec![
                "# Only if the nesting is intentional:".into(),
                format!("pipeweave generate --max-depth {} <INPUT>", limit * 2),
            ],
        }
    }

    /// Suggest giving a step exactly one behavior
    pub fn pick_step_behavior() -> Self {
        Self {
            action: "Give the step exactly one behavior".into(),
            steps: vec![
                "GitHub steps set either 'uses' or 'run'".into(),
                "Azure steps set either 'task' or 'script'".into(),
                "Set 'disabled: true' to drop a step without removing it".into(),
            ],
            commands: vec![],
        }
    }
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "→ {}", self.action)?;

        for step in &self.steps {
            writeln!(f, "  {}", step)?;
        }

        if !self.commands.is_empty() {
            writeln!(f)?;
            for cmd in &self.commands {
                writeln!(f, "  {}", cmd)?;
            }
        }

        Ok(())
    }
}
