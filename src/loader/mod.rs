// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Authoring file loader
//!
//! Reads a tree document (YAML, or JSON by extension) into a [`Node`]:
//!
//! ```yaml
//! macros:
//!   cargo:
//!     params: { command: test }
//!     body:
//!       - github.step: { run: "cargo ${{ params.command }}" }
//! root:
//!   github.workflow:
//!     name: CI
//!     children:
//!       - github.job:
//!           id: test
//!           runsOn: ubuntu-latest
//!           children:
//!             - use: cargo
//!               with: { command: clippy }
//! ```
//!
//! A node is a single-key mapping `{<kind>: {props..., children: [...]}}`,
//! `{group: [...]}` or `{use: <macro>, with: {...}}`. Sequences splice, and
//! `null` or booleans stand for nothing.

mod template;

pub use template::TemplateRule;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use std::sync::Arc;

use crate::errors::{PipeweaveError, PipeweaveResult};
use crate::files;
use crate::tree::{Node, PrimitiveKind, Props, Slot};

/// A template macro declared in an authoring file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MacroDef {
    /// Parameter defaults
    #[serde(default)]
    pub params: Props,
    /// Node, sequence of nodes, or null
    pub body: Value,
}

/// Macros available while parsing one document
pub type MacroSet = IndexMap<String, MacroDef>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    #[serde(default)]
    macros: MacroSet,
    root: Value,
}

/// Source format of an authoring file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Json,
}

impl SourceFormat {
    /// Pick the format from a file extension (JSON for `.json`, YAML otherwise)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Load a tree from a file on disk
pub async fn load_file(path: &Path) -> PipeweaveResult<Node> {
    let content = files::read_input(path).await?;
    parse_str(&content, SourceFormat::from_path(path))
}

/// Parse a tree document
pub fn parse_str(content: &str, format: SourceFormat) -> PipeweaveResult<Node> {
    let raw: RawDocument = match format {
        SourceFormat::Yaml => serde_yaml::from_str(content)?,
        SourceFormat::Json => serde_json::from_str(content)?,
    };

    let parser = NodeParser::new(Arc::new(raw.macros));
    let mut nodes = parser.parse_slot(&raw.root, "root")?.into_nodes();

    match nodes.len() {
        1 => Ok(nodes.remove(0)),
        0 => Err(PipeweaveError::InvalidTree {
            reason: "root is empty".into(),
            help: Some("Set 'root' to a 'github.workflow' or 'azure.pipeline' node".into()),
        }),
        n => Err(PipeweaveError::invalid_tree(format!(
            "root must be a single node, found {}",
            n
        ))),
    }
}

/// Turns YAML values into nodes
#[derive(Clone)]
pub(crate) struct NodeParser {
    macros: Arc<MacroSet>,
}

impl NodeParser {
    pub(crate) fn new(macros: Arc<MacroSet>) -> Self {
        Self { macros }
    }

    /// Parse anything that may occupy a child position
    pub(crate) fn parse_slot(&self, value: &Value, path: &str) -> PipeweaveResult<Slot> {
        match value {
            Value::Null | Value::Bool(_) => Ok(Slot::Empty),
            Value::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.parse_slot(item, &format!("{}[{}]", path, i)))
                .collect::<PipeweaveResult<Vec<_>>>()
                .map(Slot::Many),
            Value::Mapping(map) => self.parse_node(map, path).map(Slot::One),
            other => Err(PipeweaveError::invalid_tree(format!(
                "{}: expected a node, a sequence or null, found {}",
                path,
                describe(other)
            ))),
        }
    }

    fn parse_node(&self, map: &Mapping, path: &str) -> PipeweaveResult<Node> {
        if map.contains_key("use") {
            return self.parse_use(map, path);
        }

        let mut entries = map.iter();
        let (Some((key, body)), None) = (entries.next(), entries.next()) else {
            return Err(PipeweaveError::InvalidTree {
                reason: format!("{}: a node is a mapping with exactly one key", path),
                help: Some("Write nodes as '- github.step: { run: ... }'".into()),
            });
        };

        let key = key.as_str().ok_or_else(|| {
            PipeweaveError::invalid_tree(format!("{}: node kind must be a string", path))
        })?;
        let path = format!("{}.{}", path, key);

        if key == "group" {
            return Ok(Node::group(self.parse_slot(body, &path)?));
        }

        let kind = PrimitiveKind::from_name(key).ok_or_else(|| PipeweaveError::InvalidTree {
            reason: format!("{}: unknown node kind '{}'", path, key),
            help: Some(format!(
                "Known kinds: group, use, {}",
                PrimitiveKind::ALL.map(|k| k.as_str()).join(", ")
            )),
        })?;

        let (props, children) = match body {
            Value::Null => (Props::new(), Slot::Empty),
            Value::Mapping(fields) => {
                let mut props = to_props(fields, &path)?;
                let children = match props.shift_remove("children") {
                    Some(children) => self.parse_slot(&children, &format!("{}.children", path))?,
                    None => Slot::Empty,
                };
                (props, children)
            }
            other => {
                return Err(PipeweaveError::invalid_tree(format!(
                    "{}: expected properties, found {}",
                    path,
                    describe(other)
                )))
            }
        };

        Ok(Node::primitive(kind, props, children))
    }

    fn parse_use(&self, map: &Mapping, path: &str) -> PipeweaveResult<Node> {
        let extra = map
            .keys()
            .filter_map(Value::as_str)
            .find(|k| *k != "use" && *k != "with");
        if let Some(extra) = extra {
            return Err(PipeweaveError::invalid_tree(format!(
                "{}: unexpected key '{}' next to 'use'",
                path, extra
            )));
        }

        let name = map
            .get("use")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                PipeweaveError::invalid_tree(format!("{}: 'use' must name a macro", path))
            })?;

        if !self.macros.contains_key(name) {
            return Err(PipeweaveError::UnknownMacro { name: name.into() });
        }

        let props = match map.get("with") {
            None | Some(Value::Null) => Props::new(),
            Some(Value::Mapping(with)) => to_props(with, &format!("{}.with", path))?,
            Some(other) => {
                return Err(PipeweaveError::invalid_tree(format!(
                    "{}: 'with' must be a mapping, found {}",
                    path,
                    describe(other)
                )))
            }
        };

        Ok(Node::custom(TemplateRule::new(name, self.clone()), props))
    }

    pub(crate) fn macro_def(&self, name: &str) -> Option<&MacroDef> {
        self.macros.get(name)
    }
}

fn to_props(fields: &Mapping, path: &str) -> PipeweaveResult<Props> {
    fields
        .iter()
        .map(|(key, value)| match key.as_str() {
            Some(key) => Ok((key.to_string(), value.clone())),
            None => Err(PipeweaveError::invalid_tree(format!(
                "{}: property names must be strings",
                path
            ))),
        })
        .collect()
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
