// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! End-to-end tests against the mlpipe binary

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn mlpipe(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mlpipe").unwrap();
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("MLPIPE_PIPELINE")
        .env_remove("MLPIPE_PYTHON")
        .env_remove("RUST_LOG");
    cmd
}

fn project(pipeline_yaml: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".mlpipe.yaml"), pipeline_yaml).unwrap();
    dir
}

const ALL_PASS: &str = r#"
name: all-pass
steps:
  - name: A
    command: ["true"]
  - name: B
    command: { type: shell, script: "exit 0" }
  - name: C
    command: ["true"]
"#;

const MIDDLE_FAILS: &str = r#"
name: middle-fails
steps:
  - name: A
    command: { type: shell, script: "touch a.out" }
  - name: B
    command: { type: shell, script: "echo 'model file missing' >&2; exit 1" }
  - name: C
    command: { type: shell, script: "touch c.out" }
"#;

#[test]
fn test_all_steps_complete() {
    let dir = project(ALL_PASS);

    mlpipe(dir.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("STARTING: A"))
        .stdout(predicate::str::contains("COMPLETED: A"))
        .stdout(predicate::str::contains("COMPLETED: B"))
        .stdout(predicate::str::contains("COMPLETED: C"))
        .stdout(predicate::str::contains("Pipeline completed successfully"));
}

#[test]
fn test_failure_exits_one_and_skips_later_steps() {
    let dir = project(MIDDLE_FAILS);

    mlpipe(dir.path())
        .arg("run")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("COMPLETED: A"))
        .stdout(predicate::str::contains("FAILED: B"))
        .stdout(predicate::str::contains("Error: exited with status 1"))
        .stdout(predicate::str::contains("Error: model file missing"))
        .stdout(predicate::str::contains("STARTING: C").not())
        .stdout(predicate::str::contains("Pipeline aborted at step 2 (B)"));

    assert!(dir.path().join("a.out").exists());
    assert!(!dir.path().join("c.out").exists());
}

#[test]
fn test_spawn_failure_is_reported() {
    let dir = project(
        r#"
name: missing-tool
steps:
  - name: A
    command: ["mlpipe-no-such-program-xyz"]
  - name: B
    command: ["true"]
"#,
    );

    mlpipe(dir.path())
        .arg("run")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED: A"))
        .stdout(predicate::str::contains("failed to start 'mlpipe-no-such-program-xyz'"))
        .stdout(predicate::str::contains("STARTING: B").not());
}

#[test]
fn test_resume_from_failed_step() {
    let dir = project(MIDDLE_FAILS);

    mlpipe(dir.path())
        .args(["run", "--from", "C"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SKIPPED: A"))
        .stdout(predicate::str::contains("STARTING: B").not())
        .stdout(predicate::str::contains("COMPLETED: C"));

    assert!(dir.path().join("c.out").exists());
    assert!(!dir.path().join("a.out").exists());
}

#[test]
fn test_unknown_from_step_is_an_error() {
    let dir = project(ALL_PASS);

    mlpipe(dir.path())
        .args(["run", "--from", "nope"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("STARTING").not());
}

#[test]
fn test_step_before_from_selects_nothing_and_fails() {
    let dir = project(MIDDLE_FAILS);

    mlpipe(dir.path())
        .args(["run", "--from", "C", "--step", "A"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("STARTING").not())
        .stdout(predicate::str::contains("Pipeline completed successfully").not());

    assert!(!dir.path().join("a.out").exists());
}

#[test]
fn test_dry_run_prints_plan_only() {
    let dir = project(MIDDLE_FAILS);

    mlpipe(dir.path())
        .args(["run", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Execution plan (3 steps)"))
        .stdout(predicate::str::contains("STARTING").not());

    assert!(!dir.path().join("a.out").exists());
}

#[test]
fn test_report_written_on_failure() {
    let dir = project(MIDDLE_FAILS);

    mlpipe(dir.path())
        .args(["run", "--report", "out/report.json"])
        .assert()
        .code(1);

    let report = std::fs::read_to_string(dir.path().join("out/report.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(json["outcome"], "aborted");
    assert_eq!(json["failed_step"], "B");
    assert_eq!(json["steps"].as_array().unwrap().len(), 2);
}

#[test]
fn test_working_dir_and_env_reach_the_step() {
    let dir = project(
        r#"
name: dirs
env:
  STAGE: pipeline
steps:
  - name: deploy
    working_dir: deployment/terraform
    env:
      TARGET: bucket
    command: { type: shell, script: "printf '%s-%s' \"$STAGE\" \"$TARGET\" > applied.txt" }
"#,
    );
    std::fs::create_dir_all(dir.path().join("deployment/terraform")).unwrap();

    mlpipe(dir.path()).arg("run").assert().success();

    let applied =
        std::fs::read_to_string(dir.path().join("deployment/terraform/applied.txt")).unwrap();
    assert_eq!(applied, "pipeline-bucket");
}

#[test]
fn test_validate_rejects_duplicate_steps() {
    let dir = project(
        r#"
name: dup
steps:
  - name: A
    command: ["true"]
  - name: A
    command: ["true"]
"#,
    );

    mlpipe(dir.path())
        .arg("validate")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Duplicate step name: 'A'"));
}

#[test]
fn test_validate_accepts_good_pipeline() {
    let dir = project(ALL_PASS);

    mlpipe(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pipeline is valid!"));
}

#[test]
fn test_list_falls_back_to_builtin_pipeline() {
    let dir = tempfile::tempdir().unwrap();

    mlpipe(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("using the built-in pipeline"))
        .stdout(predicate::str::contains("1. Running Spark data processing job"))
        .stdout(predicate::str::contains("3. Deploying model to S3 via Terraform"))
        .stdout(predicate::str::contains("$ terraform apply -auto-approve"));
}

#[test]
fn test_init_writes_pipeline_and_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();

    mlpipe(dir.path())
        .args(["init", "--python", "python3"])
        .assert()
        .success();

    let written = std::fs::read_to_string(dir.path().join(".mlpipe.yaml")).unwrap();
    assert!(written.contains("python3"));
    assert!(written.contains("deployment/terraform"));

    mlpipe(dir.path()).arg("init").assert().code(1);
    mlpipe(dir.path()).args(["init", "--force"]).assert().success();
}

#[test]
fn test_explicit_pipeline_flag() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("conf")).unwrap();
    std::fs::write(dir.path().join("conf/pipe.yaml"), ALL_PASS).unwrap();

    mlpipe(dir.path())
        .args(["run", "-p", "conf/pipe.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("COMPLETED: C"));
}
