// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Tree model
//!
//! The authored pipeline is a tree of immutable [`Node`]s. Primitive nodes
//! are understood by a platform compiler, groups are transparent and splice
//! their children into the parent, and custom nodes carry an
//! [`ExpansionRule`] that produces a new subtree on demand.

mod rule;
mod slot;

pub use rule::{ExpansionRule, FnRule};
pub use slot::Slot;

use indexmap::IndexMap;
pub use serde_yaml::Value;
use std::fmt;
use std::sync::Arc;

/// Property bag of a node (insertion order preserved)
pub type Props = IndexMap<String, Value>;

/// Build a [`Props`] map from `key => value` pairs
///
/// ```
/// let props = pipeweave::props! { "run" => "cargo test", "timeoutMinutes" => 10 };
/// assert_eq!(props.len(), 2);
/// ```
#[macro_export]
macro_rules! props {
    () => { $crate::tree::Props::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut props = $crate::tree::Props::new();
        $( props.insert(::std::string::String::from($key), $crate::tree::Value::from($value)); )+
        props
    }};
}

/// Structural role of a primitive within a platform document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Top-level container (workflow, pipeline)
    Root,
    /// Intermediate grouping level holding jobs
    Stage,
    /// Execution unit holding steps
    Job,
    /// Terminal action
    Step,
}

/// Node kinds natively understood by a platform compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    GithubWorkflow,
    GithubJob,
    GithubStep,
    AzurePipeline,
    AzureStage,
    AzureJob,
    AzureStep,
}

impl PrimitiveKind {
    /// Every primitive kind
    pub const ALL: [PrimitiveKind; 7] = [
        Self::GithubWorkflow,
        Self::GithubJob,
        Self::GithubStep,
        Self::AzurePipeline,
        Self::AzureStage,
        Self::AzureJob,
        Self::AzureStep,
    ];

    /// Dotted name used in authoring files and diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GithubWorkflow => "github.workflow",
            Self::GithubJob => "github.job",
            Self::GithubStep => "github.step",
            Self::AzurePipeline => "azure.pipeline",
            Self::AzureStage => "azure.stage",
            Self::AzureJob => "azure.job",
            Self::AzureStep => "azure.step",
        }
    }

    /// Structural role of this kind
    pub fn role(&self) -> Role {
        match self {
            Self::GithubWorkflow | Self::AzurePipeline => Role::Root,
            Self::AzureStage => Role::Stage,
            Self::GithubJob | Self::AzureJob => Role::Job,
            Self::GithubStep | Self::AzureStep => Role::Step,
        }
    }

    /// Look up a kind by its dotted name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A primitive node: kind, properties and ordered children
#[derive(Debug)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub props: Props,
    pub children: Vec<Node>,
}

/// A user-defined node: an expansion rule bound to its properties
pub struct Custom {
    pub rule: Arc<dyn ExpansionRule>,
    pub props: Props,
}

impl fmt::Debug for Custom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom")
            .field("rule", &self.rule.name())
            .field("props", &self.props)
            .finish()
    }
}

/// An immutable tree node
///
/// Cloning is cheap: the payload is shared.
#[derive(Debug, Clone)]
pub enum Node {
    Primitive(Arc<Primitive>),
    Group(Arc<[Node]>),
    Custom(Arc<Custom>),
}

impl Node {
    /// Create a primitive node
    pub fn primitive(kind: PrimitiveKind, props: Props, children: impl Into<Slot>) -> Self {
        Self::Primitive(Arc::new(Primitive {
            kind,
            props,
            children: children.into().into_nodes(),
        }))
    }

    /// Create a transparent grouping node
    pub fn group(children: impl Into<Slot>) -> Self {
        Self::Group(children.into().into_nodes().into())
    }

    /// Create a user-defined node from a rule
    pub fn custom(rule: impl ExpansionRule + 'static, props: Props) -> Self {
        Self::custom_shared(Arc::new(rule), props)
    }

    /// Create a user-defined node from a shared rule
    pub fn custom_shared(rule: Arc<dyn ExpansionRule>, props: Props) -> Self {
        Self::Custom(Arc::new(Custom { rule, props }))
    }

    /// Create a user-defined node from a closure
    pub fn from_fn<F>(name: impl Into<String>, props: Props, f: F) -> Self
    where
        F: Fn(&Props) -> Result<Slot, crate::errors::RuleError> + Send + Sync + 'static,
    {
        Self::custom(FnRule::new(name, f), props)
    }

    /// Primitive kind, if this is a primitive
    pub fn kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(p) => Some(p.kind),
            _ => None,
        }
    }

    /// The primitive payload, if this is a primitive
    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Self::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Short description for diagnostics
    pub fn kind_name(&self) -> String {
        match self {
            Self::Primitive(p) => p.kind.as_str().to_string(),
            Self::Group(_) => "group".to_string(),
            Self::Custom(c) => format!("use:{}", c.rule.name()),
        }
    }
}

impl Primitive {
    /// Get a property value
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key).filter(|v| !v.is_null())
    }

    /// Get a string property
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.prop(key).and_then(Value::as_str)
    }

    /// Whether the node is explicitly disabled
    pub fn is_disabled(&self) -> bool {
        matches!(self.prop("disabled"), Some(Value::Bool(true)))
    }
}
