// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Fail-fast ordering tests
//!
//! Uses a scripted runner so the orchestrator can be exercised without
//! spawning processes, plus a few real-process scenarios.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mlpipe::executors::{ExecutionResult, ProcessRunner, StepContext, StepRunner};
use mlpipe::MlpipeError;
use mlpipe::pipeline::{
    ExecutionOptions, Pipeline, PipelineExecutor, PipelineOutcome, ProgressReporter, RunState,
    Step, StepCommand,
};

/// Runner that answers from a table of exit statuses
#[derive(Clone, Default)]
struct ScriptedRunner {
    statuses: HashMap<String, i32>,
    spawn_failures: Vec<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRunner {
    fn with_statuses(statuses: &[(&str, i32)]) -> Self {
        Self {
            statuses: statuses.iter().map(|(n, s)| (n.to_string(), *s)).collect(),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StepRunner for ScriptedRunner {
    async fn run(&self, step: &Step, _context: &StepContext) -> ExecutionResult {
        self.calls.lock().unwrap().push(step.name.clone());

        if self.spawn_failures.contains(&step.name) {
            return ExecutionResult::failure(
                &step.name,
                -1,
                "failed to start 'missing': No such file or directory",
                Duration::ZERO,
            );
        }

        let status = self.statuses.get(&step.name).copied().unwrap_or(0);
        ExecutionResult::from_exit_status(&step.name, status, Duration::ZERO)
    }
}

/// Reporter that keeps marker lines in memory
#[derive(Clone, Default)]
struct RecordingReporter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingReporter {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step_started(&self, _position: usize, _total: usize, step: &Step) {
        self.lines.lock().unwrap().push(format!("STARTING: {}", step.name));
    }

    fn step_finished(&self, _position: usize, _total: usize, step: &Step, result: &ExecutionResult) {
        let marker = if result.succeeded { "COMPLETED" } else { "FAILED" };
        self.lines.lock().unwrap().push(format!("{}: {}", marker, step.name));
    }
}

fn pipeline(names: &[&str]) -> Pipeline {
    names.iter().fold(Pipeline::new("test"), |p, name| {
        p.with_step(Step::new(*name, StepCommand::shell("true")))
    })
}

async fn execute(
    runner: ScriptedRunner,
    reporter: RecordingReporter,
    pipeline: &Pipeline,
    options: &ExecutionOptions,
) -> mlpipe::pipeline::PipelineResult {
    PipelineExecutor::new(runner)
        .with_reporter(reporter)
        .execute(pipeline, &StepContext::new("."), options)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_all_steps_succeed_in_order() {
    let runner = ScriptedRunner::default();
    let reporter = RecordingReporter::default();
    let p = pipeline(&["A", "B", "C"]);

    let result = execute(runner.clone(), reporter.clone(), &p, &ExecutionOptions::default()).await;

    assert!(result.success());
    assert_eq!(result.state, RunState::Succeeded);
    assert_eq!(runner.calls(), vec!["A", "B", "C"]);
    assert_eq!(
        reporter.lines(),
        vec![
            "STARTING: A",
            "COMPLETED: A",
            "STARTING: B",
            "COMPLETED: B",
            "STARTING: C",
            "COMPLETED: C",
        ]
    );
}

#[tokio::test]
async fn test_middle_failure_stops_the_run() {
    let runner = ScriptedRunner::with_statuses(&[("B", 1)]);
    let reporter = RecordingReporter::default();
    let p = pipeline(&["A", "B", "C"]);

    let result = execute(runner.clone(), reporter.clone(), &p, &ExecutionOptions::default()).await;

    assert_eq!(runner.calls(), vec!["A", "B"]);
    assert_eq!(
        reporter.lines(),
        vec!["STARTING: A", "COMPLETED: A", "STARTING: B", "FAILED: B"]
    );
    assert_eq!(result.state, RunState::Failed { position: 2 });
    assert_eq!(
        result.outcome,
        PipelineOutcome::Aborted {
            position: 2,
            step: "B".into(),
            error: "exited with status 1".into(),
        }
    );
}

#[tokio::test]
async fn test_failure_at_every_position() {
    let names = ["s1", "s2", "s3", "s4", "s5"];
    let p = pipeline(&names);

    for k in 0..names.len() {
        let runner = ScriptedRunner::with_statuses(&[(names[k], 2)]);
        let result = execute(
            runner.clone(),
            RecordingReporter::default(),
            &p,
            &ExecutionOptions::default(),
        )
        .await;

        assert_eq!(runner.calls(), names[..=k].to_vec(), "failure at step {}", k + 1);
        assert!(!result.success());
        assert_eq!(result.results.len(), k + 1);
        assert!(result.results[..k].iter().all(|r| r.succeeded));
        assert!(!result.results[k].succeeded);
    }
}

#[tokio::test]
async fn test_spawn_failure_aborts_with_error_text() {
    let runner = ScriptedRunner {
        spawn_failures: vec!["A".into()],
        ..Default::default()
    };
    let p = pipeline(&["A", "B"]);

    let result = execute(runner.clone(), RecordingReporter::default(), &p, &ExecutionOptions::default()).await;

    assert_eq!(runner.calls(), vec!["A"]);
    match result.outcome {
        PipelineOutcome::Aborted { position, step, error } => {
            assert_eq!(position, 1);
            assert_eq!(step, "A");
            assert!(error.starts_with("failed to start"));
        }
        PipelineOutcome::Completed => panic!("Expected the run to abort"),
    }
}

#[tokio::test]
async fn test_repeated_runs_are_deterministic() {
    let p = pipeline(&["A", "B", "C", "D"]);
    let mut outcomes = Vec::new();

    for _ in 0..2 {
        let runner = ScriptedRunner::with_statuses(&[("C", 4)]);
        let result = execute(runner, RecordingReporter::default(), &p, &ExecutionOptions::default()).await;
        outcomes.push(result.results);
    }

    assert_eq!(outcomes[0], outcomes[1]);
}

#[tokio::test]
async fn test_resume_from_named_step() {
    let runner = ScriptedRunner::default();
    let p = pipeline(&["A", "B", "C"]);
    let options = ExecutionOptions {
        from: Some("B".into()),
        ..Default::default()
    };

    let result = execute(runner.clone(), RecordingReporter::default(), &p, &options).await;

    assert!(result.success());
    assert_eq!(runner.calls(), vec!["B", "C"]);
    assert_eq!(result.skipped, vec!["A"]);
}

#[tokio::test]
async fn test_failure_position_counts_from_pipeline_start() {
    let runner = ScriptedRunner::with_statuses(&[("C", 1)]);
    let p = pipeline(&["A", "B", "C"]);
    let options = ExecutionOptions {
        steps: vec!["C".into()],
        ..Default::default()
    };

    let result = execute(runner, RecordingReporter::default(), &p, &options).await;

    assert_eq!(result.state, RunState::Failed { position: 3 });
}

#[tokio::test]
async fn test_dry_run_runs_nothing() {
    let runner = ScriptedRunner::default();
    let reporter = RecordingReporter::default();
    let p = pipeline(&["A", "B"]);
    let options = ExecutionOptions {
        dry_run: true,
        ..Default::default()
    };

    let result = execute(runner.clone(), reporter.clone(), &p, &options).await;

    assert!(result.success());
    assert!(result.dry_run);
    assert!(runner.calls().is_empty());
    assert!(reporter.lines().is_empty());
}

#[tokio::test]
async fn test_empty_selection_is_an_error_not_a_success() {
    let runner = ScriptedRunner::with_statuses(&[("A", 1), ("B", 1), ("C", 1)]);
    let p = pipeline(&["A", "B", "C"]);
    let options = ExecutionOptions {
        from: Some("C".into()),
        steps: vec!["A".into()],
        ..Default::default()
    };

    let err = PipelineExecutor::new(runner.clone())
        .execute(&p, &StepContext::new("."), &options)
        .await
        .unwrap_err();

    assert!(matches!(err, MlpipeError::InvalidPipeline { .. }));
    assert!(runner.calls().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_real_processes_hand_off_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let p = Pipeline::new("handoff")
        .with_step(Step::new("produce", StepCommand::shell("echo raw > data.txt")))
        .with_step(Step::new("transform", StepCommand::shell("tr a-z A-Z < data.txt > out.txt")))
        .with_step(Step::new("check", StepCommand::exec("grep", ["-q", "RAW", "out.txt"])));

    let result = PipelineExecutor::new(ProcessRunner::new().quiet())
        .execute(&p, &StepContext::new(dir.path()), &ExecutionOptions::default())
        .await
        .unwrap();

    assert!(result.success(), "{:?}", result.outcome);
    assert_eq!(result.results.len(), 3);
}

#[cfg(unix)]
#[tokio::test]
async fn test_real_failure_leaves_later_outputs_unwritten() {
    let dir = tempfile::tempdir().unwrap();
    let p = Pipeline::new("abort")
        .with_step(Step::new("A", StepCommand::shell("touch a")))
        .with_step(Step::new("B", StepCommand::shell("exit 1")))
        .with_step(Step::new("C", StepCommand::shell("touch c")));

    let result = PipelineExecutor::new(ProcessRunner::new().quiet())
        .execute(&p, &StepContext::new(dir.path()), &ExecutionOptions::default())
        .await
        .unwrap();

    assert!(!result.success());
    assert!(dir.path().join("a").exists());
    assert!(!dir.path().join("c").exists());
}
