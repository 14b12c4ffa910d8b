// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! GitHub Actions workflow compiler
//!
//! A workflow has a single structural level: `github.job` children of the
//! root become entries of the `jobs` map, keyed by their `id` property.
//! See: <https://docs.github.com/en/actions/using-workflows/workflow-syntax-for-github-actions>

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use super::{copy_fields, of_kind, warn_unrecognized, LeafRules, PlatformCompiler};
use crate::engine::{collect_leaves, expand_all, CompileOptions};
use crate::errors::{PipeweaveError, PipeweaveResult};
use crate::serialize::RenameTable;
use crate::tree::{Primitive, PrimitiveKind};

const WORKFLOW_FIELDS: &[&str] = &[
    "name",
    "runName",
    "on",
    "permissions",
    "env",
    "defaults",
    "concurrency",
];

const JOB_FIELDS: &[&str] = &[
    "name",
    "needs",
    "if",
    "runsOn",
    "environment",
    "permissions",
    "concurrency",
    "outputs",
    "env",
    "defaults",
    "strategy",
    "container",
    "services",
    "timeoutMinutes",
    "continueOnError",
    "uses",
    "with",
    "secrets",
];

const STEP_FIELDS: &[&str] = &[
    "id",
    "name",
    "if",
    "uses",
    "run",
    "shell",
    "with",
    "env",
    "workingDirectory",
    "continueOnError",
    "timeoutMinutes",
];

const RENAMES: RenameTable = &[
    ("runName", "run-name"),
    ("runsOn", "runs-on"),
    ("timeoutMinutes", "timeout-minutes"),
    ("continueOnError", "continue-on-error"),
    ("workingDirectory", "working-directory"),
    ("cancelInProgress", "cancel-in-progress"),
    ("failFast", "fail-fast"),
    ("maxParallel", "max-parallel"),
    ("pathsIgnore", "paths-ignore"),
    ("branchesIgnore", "branches-ignore"),
    ("tagsIgnore", "tags-ignore"),
    ("pullRequests", "pull-requests"),
    ("idToken", "id-token"),
    ("securityEvents", "security-events"),
];

const STEP_RULES: LeafRules = LeafRules {
    action: "uses",
    script: "run",
    label_keys: &["name", "id"],
};

/// Compiler for `github.workflow` roots
#[derive(Debug, Clone, Copy, Default)]
pub struct GithubActions;

impl GithubActions {
    fn compile_job(
        &self,
        job: &Primitive,
        id: &str,
        options: &CompileOptions,
    ) -> PipeweaveResult<Value> {
        let unit = format!("job '{}'", id);
        let leaves = collect_leaves(&job.children, PrimitiveKind::GithubStep, options)?;
        let steps = STEP_RULES.enabled(&leaves, &unit)?;

        let mut out = Mapping::new();
        copy_fields(&job.props, JOB_FIELDS, &mut out);

        // Reusable-workflow calls carry no steps of their own
        if !(steps.is_empty() && job.prop("uses").is_some()) {
            let steps = steps
                .into_iter()
                .map(|step| {
                    let mut compiled = Mapping::new();
                    copy_fields(&step.props, STEP_FIELDS, &mut compiled);
                    Value::Mapping(compiled)
                })
                .collect();
            out.insert(Value::from("steps"), Value::Sequence(steps));
        }

        Ok(Value::Mapping(out))
    }
}

/// Key of a job in the `jobs` map: its scalar `id`, or `job-<position>`
fn job_id(job: &Primitive, position: usize) -> PipeweaveResult<String> {
    match job.prop("id") {
        None => Ok(format!("job-{}", position)),
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        Some(Value::Bool(id)) => Ok(id.to_string()),
        Some(_) => Err(PipeweaveError::validation(
            format!("job #{}", position),
            "'id' must be a scalar",
        )),
    }
}

impl PlatformCompiler for GithubActions {
    fn id(&self) -> &'static str {
        "github"
    }

    fn root_kind(&self) -> PrimitiveKind {
        PrimitiveKind::GithubWorkflow
    }

    fn file_extension(&self) -> &'static str {
        "yml"
    }

    fn rename_table(&self) -> RenameTable {
        RENAMES
    }

    fn description(&self) -> &'static str {
        "GitHub Actions workflow"
    }

    fn compile(
        &self,
        root: &Primitive,
        options: &CompileOptions,
    ) -> PipeweaveResult<Option<Value>> {
        if root.children.is_empty() {
            debug!("workflow has no children, nothing to render");
            return Ok(None);
        }

        let nodes = expand_all(&root.children, options)?;
        warn_unrecognized(&nodes, &[PrimitiveKind::GithubJob], "workflow");

        let jobs = of_kind(&nodes, PrimitiveKind::GithubJob);
        if jobs.is_empty() {
            warn!("workflow has children but no jobs, nothing to render");
            return Ok(None);
        }

        let mut document = Mapping::new();
        copy_fields(&root.props, WORKFLOW_FIELDS, &mut document);

        let mut compiled_jobs = Mapping::new();
        for (index, job) in jobs.iter().enumerate() {
            let id = job_id(job, index + 1)?;

            if compiled_jobs.contains_key(id.as_str()) {
                return Err(PipeweaveError::validation(
                    format!("job '{}'", id),
                    "duplicate job id; ids must be unique within a workflow",
                ));
            }

            let compiled = self.compile_job(job, &id, options)?;
            compiled_jobs.insert(Value::from(id), compiled);
        }

        debug!(jobs = compiled_jobs.len(), "compiled workflow");
        document.insert(Value::from("jobs"), Value::Mapping(compiled_jobs));
        Ok(Some(Value::Mapping(document)))
    }
}
