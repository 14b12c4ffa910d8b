// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Key-renaming YAML serializer
//!
//! Compiled documents use the authoring spelling of field names
//! (`runsOn`, `timeoutMinutes`). Each platform supplies a closed table that
//! maps those names to its wire spelling; every other key is left alone.

use serde_yaml::{Mapping, Value};

use crate::errors::PipeweaveResult;

/// Closed lookup table from authoring key to wire key
pub type RenameTable = &'static [(&'static str, &'static str)];

/// Rename keys at every depth
///
/// Nested nulls are kept (`on: { workflow_dispatch: ~ }`).
pub fn rename_keys(value: Value, table: RenameTable) -> Value {
    match value {
        Value::Mapping(map) => {
            let mut renamed = Mapping::with_capacity(map.len());
            for (key, value) in map {
                renamed.insert(rename_key(key, table), rename_keys(value, table));
            }
            Value::Mapping(renamed)
        }
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|item| rename_keys(item, table))
                .collect(),
        ),
        Value::Tagged(mut tagged) => {
            let inner = std::mem::take(&mut tagged.value);
            tagged.value = rename_keys(inner, table);
            Value::Tagged(tagged)
        }
        scalar => scalar,
    }
}

fn rename_key(key: Value, table: RenameTable) -> Value {
    match key {
        Value::String(name) => {
            let wire = table
                .iter()
                .find(|(from, _)| *from == name)
                .map(|(_, to)| (*to).to_string());
            Value::String(wire.unwrap_or(name))
        }
        other => other,
    }
}

/// Rename and write a document as YAML
///
/// `serde_yaml` keeps integers and booleans typed, writes multi-line
/// strings as literal blocks and never folds long lines.
pub fn to_yaml(document: Value, table: RenameTable) -> PipeweaveResult<String> {
    let renamed = rename_keys(document, table);
    Ok(serde_yaml::to_string(&renamed)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: RenameTable = &[
        ("runsOn", "runs-on"),
        ("timeoutMinutes", "timeout-minutes"),
        ("continueOnError", "continue-on-error"),
    ];

    fn parse(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_renames_at_every_depth() {
        let doc = parse(
            r#"
jobs:
  build:
    runsOn: ubuntu-latest
    steps:
      - run: make
        timeoutMinutes: 5
        with:
          nested:
            - continueOnError: true
"#,
        );

        let renamed = rename_keys(doc, TABLE);
        let job = &renamed["jobs"]["build"];
        assert_eq!(job["runs-on"], Value::from("ubuntu-latest"));
        assert_eq!(job["steps"][0]["timeout-minutes"], Value::from(5));
        assert_eq!(job["steps"][0]["with"]["nested"][0]["continue-on-error"], Value::from(true));
        assert!(job.get("runsOn").is_none());
    }

    #[test]
    fn test_unknown_keys_untouched() {
        let renamed = rename_keys(parse("needs: [a]\nrun_name: x\n"), TABLE);
        assert_eq!(renamed, parse("needs: [a]\nrun_name: x\n"));
    }

    #[test]
    fn test_renaming_is_idempotent() {
        let doc = parse("runsOn: linux\nsteps: [{timeoutMinutes: 1}]\n");
        let once = rename_keys(doc, TABLE);
        let twice = rename_keys(once.clone(), TABLE);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_nulls_kept() {
        let doc = parse("on:\n  workflow_dispatch: ~\n  push: { branches: [main] }\n");
        let renamed = rename_keys(doc, TABLE);
        assert!(renamed["on"].as_mapping().unwrap().contains_key("workflow_dispatch"));
        assert!(renamed["on"]["workflow_dispatch"].is_null());
    }

    #[test]
    fn test_scalar_types_round_trip() {
        let doc = parse(
            "timeoutMinutes: 30\ncontinueOnError: false\nratio: 0.5\nversion: '3.10'\n",
        );
        let text = to_yaml(doc, TABLE).unwrap();
        let back = parse(&text);

        assert!(back["timeout-minutes"].is_u64());
        assert_eq!(back["continue-on-error"], Value::Bool(false));
        assert!(back["ratio"].is_f64());
        assert_eq!(back["version"], Value::from("3.10"));
    }

    #[test]
    fn test_multiline_script_is_lossless() {
        let script = "set -eu\necho \"building\"\nmake all\n";
        let mut map = Mapping::new();
        map.insert(Value::from("run"), Value::from(script));

        let text = to_yaml(Value::Mapping(map), TABLE).unwrap();
        assert_eq!(parse(&text)["run"], Value::from(script));
    }

    #[test]
    fn test_long_lines_not_folded() {
        let long = "x ".repeat(200).trim_end().to_string();
        let mut map = Mapping::new();
        map.insert(Value::from("run"), Value::from(long.clone()));

        let text = to_yaml(Value::Mapping(map), TABLE).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert_eq!(parse(&text)["run"], Value::from(long));
    }
}
