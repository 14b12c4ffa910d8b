// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! # pipeweave - CI pipeline generator
//!
//! `pipeweave` compiles a tree of pipeline nodes into the YAML a CI platform
//! consumes. Trees mix platform primitives (workflows, jobs, steps) with
//! groups and user-defined expansion rules; the compiler expands the tree,
//! extracts each platform's fields and writes the document.
//!
//! ## Features
//!
//! - **GitHub Actions and Azure Pipelines** - one compiler per platform, picked by root kind
//! - **Macros** - closures or template macros that expand into any number of nodes
//! - **Bounded expansion** - self-referencing macros fail cleanly
//! - **Watch mode** - regenerate whenever a tree file changes
//!
//! ## Quick Start
//!
//! ```bash
//! # Write ci.generated.yml beside ci.yaml
//! pipeweave generate ci.yaml
//!
//! # Preview without writing
//! pipeweave generate 'pipelines/*.yaml' --dry-run
//!
//! # Regenerate on change
//! pipeweave watch ci.yaml
//! ```
//!
//! ## Library use
//!
//! ```
//! use pipeweave::{props, CompileOptions, Node, PrimitiveKind, RenderOutcome, RendererRegistry};
//!
//! let root = Node::primitive(
//!     PrimitiveKind::AzurePipeline,
//!     props! { "trigger" => "none" },
//!     Node::primitive(PrimitiveKind::AzureStep, props! { "script" => "make" }, ()),
//! );
//!
//! let registry = RendererRegistry::with_default_platforms();
//! match registry.render(&root, &CompileOptions::default()).unwrap() {
//!     RenderOutcome::Rendered { text, .. } => assert!(text.contains("script: make")),
//!     other => panic!("{:?}", other),
//! }
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod files;
pub mod loader;
pub mod platform;
pub mod serialize;
pub mod tree;
pub mod utils;

// Re-export commonly used types
pub use engine::CompileOptions;
pub use errors::{PipeweaveError, PipeweaveResult};
pub use platform::{PlatformCompiler, RenderOutcome, RendererRegistry};
pub use tree::{ExpansionRule, Node, PrimitiveKind, Props, Slot};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
