// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Platform schema compilers
//!
//! Each supported CI platform implements [`PlatformCompiler`]: it recognizes
//! one root kind, classifies the expanded children of that root into the
//! platform's document buckets and extracts a fixed list of fields from
//! every node. The [`RendererRegistry`] picks the compiler for a given root.

mod azure;
mod github;
mod registry;
mod validation;

pub use azure::AzurePipelines;
pub use github::GithubActions;
pub use registry::{PlatformInfo, RenderOutcome, RendererRegistry, RendererRegistryBuilder};
pub use validation::LeafRules;

use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::engine::CompileOptions;
use crate::errors::PipeweaveResult;
use crate::serialize::{self, RenameTable};
use crate::tree::{Node, Primitive, PrimitiveKind, Props};

/// Trait for platform schema compilers
///
/// # Example
///
/// ```
/// use pipeweave::engine::CompileOptions;
/// use pipeweave::platform::{GithubActions, PlatformCompiler};
/// use pipeweave::tree::{Node, PrimitiveKind};
/// use pipeweave::props;
///
/// let root = Node::primitive(
///     PrimitiveKind::GithubWorkflow,
///     props! { "name" => "CI" },
///     Node::primitive(
///         PrimitiveKind::GithubJob,
///         props! { "id" => "test", "runsOn" => "ubuntu-latest" },
///         Node::primitive(PrimitiveKind::GithubStep, props! { "run" => "make test" }, ()),
///     ),
/// );
///
/// let yaml = GithubActions
///     .render(root.as_primitive().unwrap(), &CompileOptions::default())
///     .unwrap()
///     .unwrap();
/// assert!(yaml.contains("runs-on: ubuntu-latest"));
/// ```
pub trait PlatformCompiler: Send + Sync {
    /// Platform identifier (e.g. "github", "azure")
    fn id(&self) -> &'static str;

    /// Root kind this compiler recognizes
    fn root_kind(&self) -> PrimitiveKind;

    /// File extension for generated documents
    fn file_extension(&self) -> &'static str;

    /// Authoring-to-wire key renames applied at serialization
    fn rename_table(&self) -> RenameTable;

    /// Human-readable description
    fn description(&self) -> &'static str {
        "CI configuration compiler"
    }

    /// Build the in-memory document for a root
    ///
    /// Returns `Ok(None)` when there is nothing to render.
    ///
    /// # Errors
    /// Returns an error if expansion fails or a step breaks a structural rule.
    fn compile(&self, root: &Primitive, options: &CompileOptions) -> PipeweaveResult<Option<Value>>;

    /// Compile a root and serialize it with this platform's key spelling
    ///
    /// # Errors
    /// Returns an error if compilation or serialization fails.
    fn render(
        &self,
        root: &Primitive,
        options: &CompileOptions,
    ) -> PipeweaveResult<Option<String>> {
        match self.compile(root, options)? {
            Some(document) => serialize::to_yaml(document, self.rename_table()).map(Some),
            None => Ok(None),
        }
    }
}

/// Copy the listed properties verbatim, in list order, skipping absent ones
pub(crate) fn copy_fields(props: &Props, fields: &[&str], out: &mut Mapping) {
    for field in fields {
        if let Some(value) = props.get(*field).filter(|v| !v.is_null()) {
            out.insert(Value::from(*field), value.clone());
        }
    }
}

/// Primitives of one kind, in order
pub(crate) fn of_kind(nodes: &[Node], kind: PrimitiveKind) -> Vec<&Primitive> {
    nodes
        .iter()
        .filter_map(Node::as_primitive)
        .filter(|p| p.kind == kind)
        .collect()
}

/// Log nodes that none of the recognized kinds accept
pub(crate) fn warn_unrecognized(nodes: &[Node], recognized: &[PrimitiveKind], context: &str) {
    for node in nodes {
        if !node.kind().is_some_and(|k| recognized.contains(&k)) {
            warn!(
                kind = %node.kind_name(),
                context,
                "ignoring node the platform does not accept here"
            );
        }
    }
}

/// Label a node by the first present key, falling back to its position
pub(crate) fn label(node: &Primitive, keys: &[&str], position: usize) -> String {
    keys.iter()
        .find_map(|key| node.prop_str(key))
        .map(|name| format!("'{}'", name))
        .unwrap_or_else(|| format!("#{}", position))
}
