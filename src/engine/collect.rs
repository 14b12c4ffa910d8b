// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Depth-first collection of leaf actions

use tracing::warn;

use super::{expand, CompileOptions};
use crate::errors::PipeweaveResult;
use crate::tree::{Node, PrimitiveKind};

/// Collect the `leaf` primitives of a subtree in document order
///
/// Expansion is applied child by child, so a macro or group anywhere under
/// the execution unit surfaces its steps in place. Primitives of any other
/// kind are not leaves and are skipped.
pub fn collect_leaves(
    children: &[Node],
    leaf: PrimitiveKind,
    options: &CompileOptions,
) -> PipeweaveResult<Vec<Node>> {
    let mut leaves = Vec::new();

    for child in children {
        for node in expand(child, options)? {
            if node.kind() == Some(leaf) {
                leaves.push(node);
            } else {
                warn!(
                    expected = %leaf,
                    found = %node.kind_name(),
                    "ignoring non-step node inside a job"
                );
            }
        }
    }

    Ok(leaves)
}
