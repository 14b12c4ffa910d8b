// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Expansion of groups and user-defined nodes into primitives

use tracing::trace;

use super::CompileOptions;
use crate::errors::{PipeweaveError, PipeweaveResult};
use crate::tree::Node;

/// A pending node and the name of the closest enclosing rule
struct Pending {
    node: Node,
    depth: usize,
    origin: Option<String>,
}

/// Expand a node into zero or more primitives
///
/// Primitives are returned unchanged (their children are left alone). Groups
/// splice their expanded children in place, and custom nodes are replaced by
/// the expansion of whatever their rule returns.
pub fn expand(node: &Node, options: &CompileOptions) -> PipeweaveResult<Vec<Node>> {
    expand_all(std::slice::from_ref(node), options)
}

/// Expand a sequence of sibling nodes, preserving their order
pub fn expand_all(nodes: &[Node], options: &CompileOptions) -> PipeweaveResult<Vec<Node>> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut stack: Vec<Pending> = nodes
        .iter()
        .rev()
        .map(|node| Pending {
            node: node.clone(),
            depth: 0,
            origin: None,
        })
        .collect();

    while let Some(Pending { node, depth, origin }) = stack.pop() {
        if depth > options.max_depth {
            return Err(PipeweaveError::ExpansionDepthExceeded {
                limit: options.max_depth,
                rule: origin.unwrap_or_else(|| node.kind_name()),
            });
        }

        match node {
            Node::Primitive(_) => out.push(node),
            Node::Group(children) => {
                stack.extend(children.iter().rev().map(|child| Pending {
                    node: child.clone(),
                    depth: depth + 1,
                    origin: origin.clone(),
                }));
            }
            Node::Custom(custom) => {
                let name = custom.rule.name().to_string();
                trace!(rule = %name, depth, "invoking expansion rule");

                let expanded = custom
                    .rule
                    .expand(&custom.props)
                    .map_err(|source| PipeweaveError::ExpansionFailed {
                        rule: name.clone(),
                        source,
                    })?;

                stack.extend(expanded.into_nodes().into_iter().rev().map(|child| Pending {
                    node: child,
                    depth: depth + 1,
                    origin: Some(name.clone()),
                }));
            }
        }
    }

    Ok(out)
}
