// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Tree expansion engine
//!
//! Turns an authored tree into sequences of platform primitives. Expansion
//! runs on an explicit worklist so that deeply nested or self-referencing
//! macros fail with an error instead of overflowing the stack.

mod collect;
mod expand;

pub use collect::collect_leaves;
pub use expand::{expand, expand_all};

/// Default bound on group/macro nesting during expansion
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Options for a single compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Maximum group/macro nesting before expansion fails
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CompileOptions {
    /// Set the expansion depth bound
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
