// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Azure Pipelines compiler
//!
//! A pipeline is written at one of three levels. Stages win if the root
//! has any; otherwise jobs; otherwise steps directly under the root.
//! See: <https://learn.microsoft.com/en-us/azure/devops/pipelines/yaml-schema>

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use super::{copy_fields, label, of_kind, warn_unrecognized, LeafRules, PlatformCompiler};
use crate::engine::{collect_leaves, expand_all, CompileOptions};
use crate::errors::PipeweaveResult;
use crate::serialize::RenameTable;
use crate::tree::{Node, Primitive, PrimitiveKind};

const PIPELINE_FIELDS: &[&str] = &[
    "name",
    "appendCommitMessageToRunName",
    "trigger",
    "pr",
    "schedules",
    "parameters",
    "resources",
    "variables",
    "pool",
    "lockBehavior",
];

const STAGE_FIELDS: &[&str] = &[
    "stage",
    "displayName",
    "dependsOn",
    "condition",
    "variables",
    "pool",
    "lockBehavior",
    "isSkippable",
];

const JOB_FIELDS: &[&str] = &[
    "job",
    "displayName",
    "dependsOn",
    "condition",
    "continueOnError",
    "pool",
    "container",
    "services",
    "variables",
    "strategy",
    "workspace",
    "timeoutMinutes",
    "cancelTimeoutMinutes",
];

const STEP_FIELDS: &[&str] = &[
    "task",
    "script",
    "displayName",
    "name",
    "inputs",
    "condition",
    "continueOnError",
    "enabled",
    "env",
    "workingDirectory",
    "timeoutMinutes",
    "retryCountOnTaskFailure",
    "target",
];

const RENAMES: RenameTable = &[
    ("timeoutMinutes", "timeoutInMinutes"),
    ("cancelTimeoutMinutes", "cancelTimeoutInMinutes"),
];

const STEP_RULES: LeafRules = LeafRules {
    action: "task",
    script: "script",
    label_keys: &["displayName", "name"],
};

/// Compiler for `azure.pipeline` roots
#[derive(Debug, Clone, Copy, Default)]
pub struct AzurePipelines;

impl AzurePipelines {
    fn compile_steps(&self, steps: &[Node], unit: &str) -> PipeweaveResult<Value> {
        let compiled = STEP_RULES
            .enabled(steps, unit)?
            .into_iter()
            .map(|step| {
                let mut out = Mapping::new();
                copy_fields(&step.props, STEP_FIELDS, &mut out);
                Value::Mapping(out)
            })
            .collect();
        Ok(Value::Sequence(compiled))
    }

    fn compile_job(
        &self,
        job: &Primitive,
        unit: &str,
        options: &CompileOptions,
    ) -> PipeweaveResult<Value> {
        let leaves = collect_leaves(&job.children, PrimitiveKind::AzureStep, options)?;

        let mut out = Mapping::new();
        copy_fields(&job.props, JOB_FIELDS, &mut out);
        out.insert(Value::from("steps"), self.compile_steps(&leaves, unit)?);
        Ok(Value::Mapping(out))
    }

    fn compile_jobs(
        &self,
        jobs: &[&Primitive],
        scope: Option<&str>,
        options: &CompileOptions,
    ) -> PipeweaveResult<Value> {
        let mut compiled = Vec::with_capacity(jobs.len());
        for (index, job) in jobs.iter().enumerate() {
            let name = label(job, &["job", "displayName"], index + 1);
            let unit = match scope {
                Some(stage) => format!("job {} in {}", name, stage),
                None => format!("job {}", name),
            };
            compiled.push(self.compile_job(job, &unit, options)?);
        }
        Ok(Value::Sequence(compiled))
    }

    fn compile_stage(
        &self,
        stage: &Primitive,
        position: usize,
        options: &CompileOptions,
    ) -> PipeweaveResult<Value> {
        let scope = format!("stage {}", label(stage, &["stage", "displayName"], position));
        let nodes = expand_all(&stage.children, options)?;
        warn_unrecognized(&nodes, &[PrimitiveKind::AzureJob], &scope);

        let mut out = Mapping::new();
        copy_fields(&stage.props, STAGE_FIELDS, &mut out);
        let jobs = of_kind(&nodes, PrimitiveKind::AzureJob);
        out.insert(
            Value::from("jobs"),
            self.compile_jobs(&jobs, Some(&scope), options)?,
        );
        Ok(Value::Mapping(out))
    }
}

impl PlatformCompiler for AzurePipelines {
    fn id(&self) -> &'static str {
        "azure"
    }

    fn root_kind(&self) -> PrimitiveKind {
        PrimitiveKind::AzurePipeline
    }

    fn file_extension(&self) -> &'static str {
        "yaml"
    }

    fn rename_table(&self) -> RenameTable {
        RENAMES
    }

    fn description(&self) -> &'static str {
        "Azure Pipelines definition"
    }

    fn compile(
        &self,
        root: &Primitive,
        options: &CompileOptions,
    ) -> PipeweaveResult<Option<Value>> {
        if root.children.is_empty() {
            debug!("pipeline has no children, nothing to render");
            return Ok(None);
        }

        let nodes = expand_all(&root.children, options)?;
        let stages = of_kind(&nodes, PrimitiveKind::AzureStage);
        let jobs = of_kind(&nodes, PrimitiveKind::AzureJob);
        let steps: Vec<Node> = nodes
            .iter()
            .filter(|n| n.kind() == Some(PrimitiveKind::AzureStep))
            .cloned()
            .collect();

        let mut document = Mapping::new();
        copy_fields(&root.props, PIPELINE_FIELDS, &mut document);

        if !stages.is_empty() {
            warn_unrecognized(&nodes, &[PrimitiveKind::AzureStage], "pipeline with stages");
            let mut compiled = Vec::with_capacity(stages.len());
            for (index, stage) in stages.iter().enumerate() {
                compiled.push(self.compile_stage(stage, index + 1, options)?);
            }
            debug!(stages = compiled.len(), "compiled pipeline");
            document.insert(Value::from("stages"), Value::Sequence(compiled));
        } else if !jobs.is_empty() {
            warn_unrecognized(&nodes, &[PrimitiveKind::AzureJob], "pipeline with jobs");
            document.insert(Value::from("jobs"), self.compile_jobs(&jobs, None, options)?);
        } else if !steps.is_empty() {
            warn_unrecognized(&nodes, &[PrimitiveKind::AzureStep], "pipeline with steps");
            document.insert(Value::from("steps"), self.compile_steps(&steps, "pipeline")?);
        } else {
            warn!("pipeline has children but no stages, jobs or steps, nothing to render");
            return Ok(None);
        }

        Ok(Some(Value::Mapping(document)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props;
    use crate::serialize;
    use crate::tree::{Props, Slot};

    fn node(kind: PrimitiveKind, props: Props, children: impl Into<Slot>) -> Node {
        Node::primitive(kind, props, children)
    }

    fn script(text: &str) -> Node {
        node(PrimitiveKind::AzureStep, props! { "script" => text }, ())
    }

    fn render(root: &Node) -> PipeweaveResult<Option<String>> {
        AzurePipelines.render(root.as_primitive().unwrap(), &CompileOptions::default())
    }

    fn parse(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_trigger_none_without_children_is_empty() {
        let root = node(PrimitiveKind::AzurePipeline, props! { "trigger" => "none" }, ());
        assert!(render(&root).unwrap().is_none());
    }

    #[test]
    fn test_children_without_any_bucket_is_empty() {
        let root = node(
            PrimitiveKind::AzurePipeline,
            props! {},
            Node::from_fn("nothing", props! {}, |_| Ok(Slot::Empty)),
        );
        assert!(render(&root).unwrap().is_none());
    }

    #[test]
    fn test_stages_take_priority() {
        let root = node(
            PrimitiveKind::AzurePipeline,
            props! { "trigger" => "none" },
            vec![
                script("ignored"),
                node(
                    PrimitiveKind::AzureStage,
                    props! { "stage" => "Build" },
                    node(
                        PrimitiveKind::AzureJob,
                        props! { "job" => "compile", "timeoutMinutes" => 30 },
                        vec![script("make"), script("make test")],
                    ),
                ),
                node(PrimitiveKind::AzureJob, props! { "job" => "ignored" }, ()),
            ],
        );

        let doc = parse(&render(&root).unwrap().unwrap());
        assert_eq!(doc["trigger"], Value::from("none"));
        assert!(doc.get("jobs").is_none());
        assert!(doc.get("steps").is_none());

        let job = &doc["stages"][0]["jobs"][0];
        assert_eq!(job["job"], Value::from("compile"));
        assert_eq!(job["timeoutInMinutes"], Value::from(30));
        assert_eq!(job["steps"].as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn test_jobs_when_no_stages() {
        let root = node(
            PrimitiveKind::AzurePipeline,
            props! { "pool" => "ubuntu-latest" },
            vec![
                node(PrimitiveKind::AzureJob, props! { "job" => "a" }, script("one")),
                node(
                    PrimitiveKind::AzureJob,
                    props! { "job" => "b", "dependsOn" => "a" },
                    Node::group(vec![script("two"), script("three")]),
                ),
            ],
        );

        let doc = parse(&render(&root).unwrap().unwrap());
        let jobs = doc["jobs"].as_sequence().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1]["dependsOn"], Value::from("a"));
        assert_eq!(jobs[1]["steps"][1]["script"], Value::from("three"));
    }

    #[test]
    fn test_steps_directly_under_root() {
        let root = node(
            PrimitiveKind::AzurePipeline,
            props! {},
            vec![
                node(PrimitiveKind::AzureStep, props! { "task" => "NodeTool@0" }, ()),
                node(
                    PrimitiveKind::AzureStep,
                    props! { "script" => "skip", "disabled" => true },
                    (),
                ),
                script("npm test"),
            ],
        );

        let doc = parse(&render(&root).unwrap().unwrap());
        let steps = doc["steps"].as_sequence().unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0]["task"], Value::from("NodeTool@0"));
        assert_eq!(steps[1]["script"], Value::from("npm test"));
        assert!(steps[1].get("disabled").is_none());
    }

    #[test]
    fn test_task_and_script_are_exclusive() {
        let root = node(
            PrimitiveKind::AzurePipeline,
            props! {},
            node(
                PrimitiveKind::AzureStage,
                props! { "stage" => "Test" },
                node(
                    PrimitiveKind::AzureJob,
                    props! { "job" => "unit" },
                    node(
                        PrimitiveKind::AzureStep,
                        props! { "task" => "X@1", "script" => "y" },
                        (),
                    ),
                ),
            ),
        );

        let err = render(&root).unwrap_err();
        assert_eq!(
            err.to_string(),
            "step #1 in job 'unit' in stage 'Test': \
             sets both 'task' and 'script'; a step takes exactly one of them"
        );
    }

    #[test]
    fn test_every_rename_reaches_the_wire() {
        let root = node(
            PrimitiveKind::AzurePipeline,
            props! {},
            node(
                PrimitiveKind::AzureJob,
                props! { "job" => "deploy", "timeoutMinutes" => 60, "cancelTimeoutMinutes" => 5 },
                node(
                    PrimitiveKind::AzureStep,
                    props! { "script" => "./deploy.sh", "timeoutMinutes" => 10 },
                    (),
                ),
            ),
        );

        let text = render(&root).unwrap().unwrap();
        for (authoring, wire) in RENAMES {
            assert!(text.contains(&format!("{}:", wire)), "{} missing from output", wire);
            assert!(!text.contains(&format!("{}:", authoring)), "{} was not renamed", authoring);
        }

        let doc = parse(&text);
        assert_eq!(doc["jobs"][0]["timeoutInMinutes"], Value::from(60));
        assert_eq!(doc["jobs"][0]["cancelTimeoutInMinutes"], Value::from(5));
        assert_eq!(doc["jobs"][0]["steps"][0]["timeoutInMinutes"], Value::from(10));

        let document = AzurePipelines
            .compile(root.as_primitive().unwrap(), &CompileOptions::default())
            .unwrap()
            .unwrap();
        let once = serialize::rename_keys(document, RENAMES);
        assert_eq!(serialize::rename_keys(once.clone(), RENAMES), once);
    }

    #[test]
    fn test_stage_without_jobs_has_empty_list() {
        let root = node(
            PrimitiveKind::AzurePipeline,
            props! {},
            node(PrimitiveKind::AzureStage, props! { "stage" => "Empty" }, ()),
        );

        let doc = parse(&render(&root).unwrap().unwrap());
        assert_eq!(doc["stages"][0]["jobs"], Value::Sequence(vec![]));
    }

    #[test]
    fn test_multiline_script_round_trips() {
        let body = "echo one\necho two\n";
        let root = node(PrimitiveKind::AzurePipeline, props! {}, script(body));

        let doc = parse(&render(&root).unwrap().unwrap());
        assert_eq!(doc["steps"][0]["script"], Value::from(body));
    }
}
