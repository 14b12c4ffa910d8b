// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Renderer registry
//!
//! An ordered list of platform compilers. The first compiler whose root
//! kind matches a tree's root renders it.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::{AzurePipelines, GithubActions, PlatformCompiler};
use crate::engine::CompileOptions;
use crate::errors::PipeweaveResult;
use crate::tree::Node;

/// Result of rendering a root through the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A document was produced
    Rendered {
        platform: &'static str,
        extension: &'static str,
        text: String,
    },
    /// A compiler matched but there was nothing to render
    Empty,
    /// No registered compiler recognizes the root
    NoRenderer { kind: String },
}

/// Information about a registered compiler
#[derive(Debug, Clone, Serialize)]
pub struct PlatformInfo {
    /// Platform identifier
    pub id: &'static str,
    /// Recognized root kind
    pub root_kind: &'static str,
    /// File extension of generated documents
    pub extension: &'static str,
    /// Human-readable description
    pub description: &'static str,
}

/// Ordered registry of platform compilers
///
/// # Example
///
/// ```
/// use pipeweave::platform::{RendererRegistry, RenderOutcome};
/// use pipeweave::engine::CompileOptions;
/// use pipeweave::tree::{Node, PrimitiveKind};
/// use pipeweave::props;
///
/// let registry = RendererRegistry::with_default_platforms();
/// let root = Node::primitive(PrimitiveKind::AzurePipeline, props! { "trigger" => "none" }, ());
///
/// let outcome = registry.render(&root, &CompileOptions::default()).unwrap();
/// assert_eq!(outcome, RenderOutcome::Empty);
/// ```
#[derive(Clone, Default)]
pub struct RendererRegistry {
    compilers: Vec<Arc<dyn PlatformCompiler>>,
}

impl RendererRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in platform (GitHub, then Azure)
    pub fn with_default_platforms() -> Self {
        Self::builder().with(GithubActions).with(AzurePipelines).build()
    }

    /// Start building a registry
    pub fn builder() -> RendererRegistryBuilder {
        RendererRegistryBuilder::default()
    }

    /// Append a compiler
    pub fn register(&mut self, compiler: impl PlatformCompiler + 'static) {
        self.compilers.push(Arc::new(compiler));
    }

    /// First compiler whose root kind matches the node
    pub fn find(&self, root: &Node) -> Option<Arc<dyn PlatformCompiler>> {
        let kind = root.kind()?;
        self.compilers.iter().find(|c| c.root_kind() == kind).cloned()
    }

    /// Get a compiler by platform id
    pub fn get(&self, id: &str) -> Option<Arc<dyn PlatformCompiler>> {
        self.compilers.iter().find(|c| c.id() == id).cloned()
    }

    /// Information about every registered compiler, in registration order
    pub fn info(&self) -> Vec<PlatformInfo> {
        self.compilers
            .iter()
            .map(|c| PlatformInfo {
                id: c.id(),
                root_kind: c.root_kind().as_str(),
                extension: c.file_extension(),
                description: c.description(),
            })
            .collect()
    }

    /// Number of registered compilers
    pub fn len(&self) -> usize {
        self.compilers.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.compilers.is_empty()
    }

    /// Render a root with the matching compiler
    ///
    /// An unrecognized root is reported as [`RenderOutcome::NoRenderer`],
    /// not as an error.
    ///
    /// # Errors
    /// Returns an error if compilation or serialization fails.
    pub fn render(&self, root: &Node, options: &CompileOptions) -> PipeweaveResult<RenderOutcome> {
        let (Some(compiler), Some(primitive)) = (self.find(root), root.as_primitive()) else {
            return Ok(RenderOutcome::NoRenderer {
                kind: root.kind_name(),
            });
        };

        debug!(platform = compiler.id(), "rendering root");
        Ok(match compiler.render(primitive, options)? {
            Some(text) => RenderOutcome::Rendered {
                platform: compiler.id(),
                extension: compiler.file_extension(),
                text,
            },
            None => RenderOutcome::Empty,
        })
    }
}

/// Builder for [`RendererRegistry`]
#[derive(Default)]
pub struct RendererRegistryBuilder {
    registry: RendererRegistry,
}

impl RendererRegistryBuilder {
    /// Append a compiler
    #[must_use]
    pub fn with(mut self, compiler: impl PlatformCompiler + 'static) -> Self {
        self.registry.register(compiler);
        self
    }

    /// Finish building
    pub fn build(self) -> RendererRegistry {
        self.registry
    }
}
