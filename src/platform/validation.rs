// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Leaf (step) validation
//!
//! A step carries exactly one of two behaviors: an external action or an
//! inline script. Steps flagged `disabled: true` are dropped before they are
//! checked.

use tracing::debug;

use super::label;
use crate::errors::{PipeweaveError, PipeweaveResult};
use crate::tree::{Node, Primitive};

/// Step rules for one platform
#[derive(Debug, Clone, Copy)]
pub struct LeafRules {
    /// Key referencing an external action (`uses`, `task`)
    pub action: &'static str,
    /// Key holding an inline script (`run`, `script`)
    pub script: &'static str,
    /// Keys tried, in order, to name a step in diagnostics
    pub label_keys: &'static [&'static str],
}

impl LeafRules {
    /// Check one step's behaviors
    pub fn check(&self, step: &Primitive, position: usize, unit: &str) -> PipeweaveResult<()> {
        let has_action = step.prop(self.action).is_some();
        let has_script = step.prop(self.script).is_some();

        let message = match (has_action, has_script) {
            (true, false) | (false, true) => return Ok(()),
            (true, true) => format!(
                "sets both '{}' and '{}'; a step takes exactly one of them",
                self.action, self.script
            ),
            (false, false) => format!("must set either '{}' or '{}'", self.action, self.script),
        };

        let entity = format!("step {} in {}", label(step, self.label_keys, position), unit);
        Err(PipeweaveError::validation(entity, message))
    }

    /// Drop disabled steps and validate the rest, keeping order
    ///
    /// Positions in diagnostics count every collected step, disabled or not.
    pub fn enabled<'a>(
        &self,
        steps: &'a [Node],
        unit: &str,
    ) -> PipeweaveResult<Vec<&'a Primitive>> {
        let mut kept = Vec::with_capacity(steps.len());

        for (index, step) in steps.iter().filter_map(Node::as_primitive).enumerate() {
            if step.is_disabled() {
                debug!(unit, position = index + 1, "dropping disabled step");
                continue;
            }
            self.check(step, index + 1, unit)?;
            kept.push(step);
        }

        Ok(kept)
    }
}
