// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Child slot normalization
//!
//! Everything that may sit in a child position converts into a [`Slot`].
//! Absent values and booleans contribute nothing, sequences splice in order.

use super::Node;

/// A child position: zero or more nodes
#[derive(Debug, Clone, Default)]
pub enum Slot {
    #[default]
    Empty,
    One(Node),
    Many(Vec<Slot>),
}

impl Slot {
    /// Include the slot produced by `f` only when `condition` holds
    pub fn when<S: Into<Slot>>(condition: bool, f: impl FnOnce() -> S) -> Self {
        if condition {
            f().into()
        } else {
            Self::Empty
        }
    }

    /// Flatten into nodes, preserving order
    pub fn into_nodes(self) -> Vec<Node> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<Node>) {
        match self {
            Self::Empty => {}
            Self::One(node) => out.push(node),
            Self::Many(slots) => {
                for slot in slots {
                    slot.flatten_into(out);
                }
            }
        }
    }

    /// Whether the slot holds no nodes at all
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::One(_) => false,
            Self::Many(slots) => slots.iter().all(Slot::is_empty),
        }
    }
}

impl From<Node> for Slot {
    fn from(node: Node) -> Self {
        Self::One(node)
    }
}

impl From<()> for Slot {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

/// Booleans never produce nodes (`cond && node` style slots)
impl From<bool> for Slot {
    fn from(_: bool) -> Self {
        Self::Empty
    }
}

impl<T: Into<Slot>> From<Option<T>> for Slot {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

impl<T: Into<Slot>> From<Vec<T>> for Slot {
    fn from(values: Vec<T>) -> Self {
        Self::Many(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Slot>, const N: usize> From<[T; N]> for Slot {
    fn from(values: [T; N]) -> Self {
        Self::Many(values.into_iter().map(Into::into).collect())
    }
}
