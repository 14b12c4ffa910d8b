// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Template macros
//!
//! A macro body is plain YAML with `${{ params.<name> }}` placeholders. A
//! string that is exactly one placeholder takes the parameter's value as-is
//! (a number stays a number, a node stays a node); otherwise the value is
//! interpolated as text.

use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;

use super::NodeParser;
use crate::errors::RuleError;
use crate::tree::{ExpansionRule, Props, Slot};

fn placeholder() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{\{\s*params\.([A-Za-z_][A-Za-z0-9_-]*)\s*\}\}")
            .expect("placeholder pattern is valid")
    })
}

/// Expansion rule backed by a macro declared in an authoring file
pub struct TemplateRule {
    name: String,
    parser: NodeParser,
}

impl TemplateRule {
    pub(crate) fn new(name: impl Into<String>, parser: NodeParser) -> Self {
        Self {
            name: name.into(),
            parser,
        }
    }
}

impl ExpansionRule for TemplateRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn expand(&self, props: &Props) -> Result<Slot, RuleError> {
        let def = self
            .parser
            .macro_def(&self.name)
            .ok_or_else(|| format!("macro '{}' is not declared", self.name))?;

        let mut params = def.params.clone();
        for (key, value) in props {
            params.insert(key.clone(), value.clone());
        }

        let body = substitute(&def.body, &params)?;
        let slot = self.parser.parse_slot(&body, &format!("macro '{}'", self.name))?;
        Ok(slot)
    }
}

/// Replace placeholders throughout a value
pub(crate) fn substitute(value: &Value, params: &Props) -> Result<Value, RuleError> {
    match value {
        Value::String(text) => substitute_str(text, params),
        Value::Sequence(items) => items
            .iter()
            .map(|item| substitute(item, params))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence),
        Value::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, item) in map {
                let key = match key {
                    Value::String(text) => Value::String(interpolate(text, params)?),
                    other => other.clone(),
                };
                out.insert(key, substitute(item, params)?);
            }
            Ok(Value::Mapping(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_str(text: &str, params: &Props) -> Result<Value, RuleError> {
    let pattern = placeholder();

    if let Some(caps) = pattern.captures(text) {
        if caps.get(0).map(|m| m.as_str().len()) == Some(text.trim().len()) {
            return lookup(&caps, params).cloned();
        }
    }

    interpolate(text, params).map(Value::String)
}

fn interpolate(text: &str, params: &Props) -> Result<String, RuleError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in placeholder().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&text[last..whole.start()]);
        out.push_str(&as_text(lookup(&caps, params)?)?);
        last = whole.end();
    }

    out.push_str(&text[last..]);
    Ok(out)
}

fn lookup<'a>(caps: &Captures<'_>, params: &'a Props) -> Result<&'a Value, RuleError> {
    let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    params
        .get(name)
        .ok_or_else(|| format!("unknown parameter '{}'", name).into())
}

fn as_text(value: &Value) -> Result<String, RuleError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        _ => Err("cannot interpolate a structured value into text".into()),
    }
}
