// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const WORKFLOW: &str = r#"
macros:
  cargo:
    params:
      command: test
    body:
      github.step:
        name: "cargo ${{ params.command }}"
        run: "cargo ${{ params.command }}"
root:
  github.workflow:
    name: CI
    on:
      push:
        branches: [main]
    children:
      - github.job:
          id: build
          runsOn: ubuntu-latest
          children:
            - github.step: { uses: actions/checkout@v4 }
            - use: cargo
            - use: cargo
              with: { command: clippy }
      - github.job:
          id: deploy
          runsOn: ubuntu-latest
          needs: build
          children:
            - github.step: { run: ./deploy.sh, workingDirectory: scripts }
"#;

fn pipeweave(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pipeweave").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("PIPEWEAVE_OUT_DIR")
        .env_remove("PIPEWEAVE_MAX_DEPTH");
    cmd
}

#[test]
fn test_generate_writes_workflow() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("ci.yaml"), WORKFLOW).unwrap();

    pipeweave(&temp_dir)
        .args(["generate", "ci.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ci.generated.yml"));

    let output = fs::read_to_string(temp_dir.path().join("ci.generated.yml")).unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&output).unwrap();

    assert_eq!(doc["jobs"]["deploy"]["needs"], "build");
    assert_eq!(doc["jobs"]["deploy"]["runs-on"], "ubuntu-latest");
    assert_eq!(doc["jobs"]["deploy"]["steps"][0]["working-directory"], "scripts");
    assert_eq!(doc["jobs"]["build"]["steps"][2]["run"], "cargo clippy");
    assert!(!output.contains("runsOn"));
}

#[test]
fn test_generate_azure_with_out_dir_from_env() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("pipeline.json"),
        r#"{"root": {"azure.pipeline": {"trigger": "none", "children": [
            {"azure.job": {"job": "build", "children": [{"azure.step": {"script": "make"}}]}}
        ]}}}"#,
    )
    .unwrap();

    pipeweave(&temp_dir)
        .env("PIPEWEAVE_OUT_DIR", "out")
        .args(["generate", "*.json"])
        .assert()
        .success();

    let output = fs::read_to_string(temp_dir.path().join("out/pipeline.generated.yaml")).unwrap();
    assert!(output.contains("trigger: none"));
    assert!(output.contains("script: make"));
}

#[test]
fn test_dry_run_prints_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("ci.yaml"), WORKFLOW).unwrap();

    pipeweave(&temp_dir)
        .args(["generate", "ci.yaml", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("runs-on: ubuntu-latest"));

    assert!(!temp_dir.path().join("ci.generated.yml").exists());
}

#[test]
fn test_no_matching_input_fails() {
    let temp_dir = TempDir::new().unwrap();

    pipeweave(&temp_dir)
        .args(["generate", "missing/*.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing/*.yaml"));
}

#[test]
fn test_invalid_step_fails_and_names_it() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("bad.yaml"),
        "\
root:
  github.workflow:
    children:
      - github.job:
          id: lint
          children:
            - github.step: { name: Empty }
",
    )
    .unwrap();

    pipeweave(&temp_dir)
        .args(["generate", "bad.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("step 'Empty' in job 'lint'"));

    assert!(!temp_dir.path().join("bad.generated.yml").exists());
}

#[test]
fn test_batch_reports_every_failure() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("a.yaml"),
        "root:\n  azure.pipeline: { trigger: none }\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("b.yaml"), WORKFLOW).unwrap();

    pipeweave(&temp_dir)
        .args(["generate", "*.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("produced no output"))
        .stderr(predicate::str::contains("1 of 2"));

    assert!(temp_dir.path().join("b.generated.yml").exists());
}

#[test]
fn test_config_file_sets_max_depth() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".pipeweave.yaml"), "max_depth: 5\n").unwrap();
    fs::write(
        temp_dir.path().join("loop.yaml"),
        "\
macros:
  again:
    body: { use: again }
root:
  github.workflow:
    children:
      - use: again
",
    )
    .unwrap();

    pipeweave(&temp_dir)
        .args(["generate", "loop.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("depth limit of 5"));
}

#[test]
fn test_glob_skips_config_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".pipeweave.yaml"), "out_dir: out\n").unwrap();
    fs::write(temp_dir.path().join("ci.yaml"), WORKFLOW).unwrap();

    pipeweave(&temp_dir)
        .args(["generate", "*.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ci.generated.yml"))
        .stderr(predicate::str::contains(".pipeweave.yaml").not());

    assert!(temp_dir.path().join("out/ci.generated.yml").exists());
    assert!(!temp_dir.path().join("out/.pipeweave.generated.yml").exists());
}

#[test]
fn test_platforms_json() {
    let temp_dir = TempDir::new().unwrap();

    let assert = pipeweave(&temp_dir)
        .args(["platforms", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let platforms: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(platforms[0]["id"], "github");
    assert_eq!(platforms[1]["root_kind"], "azure.pipeline");
}
