// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! User-defined expansion rules

use super::{Props, Slot};
use crate::errors::RuleError;

/// A pure transformation from a property bag to a subtree
///
/// Rules are invoked once per occurrence, in document order. They must not
/// rely on side effects; their return value is the only thing observed.
pub trait ExpansionRule: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Produce the subtree for the given properties
    fn expand(&self, props: &Props) -> Result<Slot, RuleError>;
}

/// An [`ExpansionRule`] backed by a closure
pub struct FnRule<F> {
    name: String,
    f: F,
}

impl<F> FnRule<F>
where
    F: Fn(&Props) -> Result<Slot, RuleError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> ExpansionRule for FnRule<F>
where
    F: Fn(&Props) -> Result<Slot, RuleError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn expand(&self, props: &Props) -> Result<Slot, RuleError> {
        (self.f)(props)
    }
}
