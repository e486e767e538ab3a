// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Pipeline executor
//!
//! Runs pipeline steps one at a time, in declaration order, and stops at the
//! first failure.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::errors::{MlpipeError, MlpipeResult};
use crate::executors::{ExecutionResult, StepContext, StepRunner};
use crate::pipeline::progress::{ProgressReporter, SilentReporter};
use crate::pipeline::{Pipeline, RunState};

/// Pipeline execution options
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Only show what would be done
    pub dry_run: bool,
    /// Start at this step, skipping the ones declared before it
    pub from: Option<String>,
    /// Only run these steps (still in pipeline order)
    pub steps: Vec<String>,
}

/// Terminal outcome of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every selected step succeeded
    Completed,
    /// A step failed and the run stopped there
    Aborted {
        /// 1-based position of the failed step in the pipeline
        position: usize,
        /// Name of the failed step
        step: String,
        /// Captured error text
        error: String,
    },
}

/// Result of executing a pipeline
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Pipeline name
    pub pipeline_name: String,
    /// How the run ended
    pub outcome: PipelineOutcome,
    /// Final state machine value
    pub state: RunState,
    /// Results for each step that ran, in execution order
    pub results: Vec<ExecutionResult>,
    /// Steps left out by the selection options
    pub skipped: Vec<String>,
    /// Total execution time
    pub duration: Duration,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl PipelineResult {
    /// Whether all selected steps succeeded
    pub fn success(&self) -> bool {
        self.outcome == PipelineOutcome::Completed
    }

    /// Convert an aborted run into an error
    pub fn into_result(self) -> MlpipeResult<Self> {
        match &self.outcome {
            PipelineOutcome::Completed => Ok(self),
            PipelineOutcome::Aborted { position, step, error } => {
                Err(MlpipeError::step_failed(step, *position, error))
            }
        }
    }
}

/// Pipeline executor
pub struct PipelineExecutor {
    runner: Box<dyn StepRunner>,
    reporter: Box<dyn ProgressReporter>,
}

impl PipelineExecutor {
    /// Create a new pipeline executor around a step runner
    pub fn new(runner: impl StepRunner + 'static) -> Self {
        Self {
            runner: Box::new(runner),
            reporter: Box::new(SilentReporter),
        }
    }

    /// Set the progress reporter
    pub fn with_reporter(mut self, reporter: impl ProgressReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Execute a pipeline
    ///
    /// Returns `Err` only for configuration problems found before any step
    /// runs. A failing step yields `Ok` with `PipelineOutcome::Aborted`.
    pub async fn execute(
        &self,
        pipeline: &Pipeline,
        context: &StepContext,
        options: &ExecutionOptions,
    ) -> MlpipeResult<PipelineResult> {
        let start = Instant::now();

        let selected = Self::select_steps(pipeline, options)?;
        let total = pipeline.steps.len();

        let plan: Vec<_> = selected.iter().map(|&idx| (idx + 1, &pipeline.steps[idx])).collect();
        self.reporter.plan(&pipeline.name, &plan);

        let mut skipped = Vec::new();
        for (idx, step) in pipeline.steps.iter().enumerate() {
            if !selected.contains(&idx) {
                skipped.push(step.name.clone());
                if !options.dry_run {
                    self.reporter.step_skipped(idx + 1, step);
                }
            }
        }

        if options.dry_run {
            let result = PipelineResult {
                pipeline_name: pipeline.name.clone(),
                outcome: PipelineOutcome::Completed,
                state: RunState::Pending,
                results: Vec::new(),
                skipped,
                duration: start.elapsed(),
                dry_run: true,
            };
            self.reporter.pipeline_finished(&result);
            return Ok(result);
        }

        info!(pipeline = %pipeline.name, steps = selected.len(), "starting pipeline");

        let mut state = RunState::Pending;
        let mut results = Vec::with_capacity(selected.len());
        let mut outcome = PipelineOutcome::Completed;

        for (i, &idx) in selected.iter().enumerate() {
            let step = &pipeline.steps[idx];
            let position = idx + 1;
            let last = i + 1 == selected.len();

            state = state
                .start(position)
                .ok_or_else(|| Self::invalid_transition(state, "start", position))?;

            self.reporter.step_started(position, total, step);
            let result = self.runner.run(step, context).await;
            self.reporter.step_finished(position, total, step, &result);

            state = state
                .finish(result.succeeded, last)
                .ok_or_else(|| Self::invalid_transition(state, "finish", position))?;

            if result.succeeded {
                debug!(step = %step.name, elapsed = ?result.duration, "step completed");
            } else {
                warn!(step = %step.name, status = result.exit_status, "step failed, aborting pipeline");
                outcome = PipelineOutcome::Aborted {
                    position,
                    step: step.name.clone(),
                    error: result.error_text().to_string(),
                };
            }

            results.push(result);

            if state.is_terminal() {
                break;
            }
        }

        let result = PipelineResult {
            pipeline_name: pipeline.name.clone(),
            outcome,
            state,
            results,
            skipped,
            duration: start.elapsed(),
            dry_run: false,
        };

        info!(pipeline = %pipeline.name, state = %result.state, "pipeline finished");
        self.reporter.pipeline_finished(&result);

        Ok(result)
    }

    /// Indices of the steps to run, in declaration order
    fn select_steps(pipeline: &Pipeline, options: &ExecutionOptions) -> MlpipeResult<Vec<usize>> {
        if pipeline.steps.is_empty() {
            return Err(MlpipeError::InvalidPipeline {
                reason: "Pipeline has no steps defined".into(),
                help: None,
            });
        }

        let first = match &options.from {
            Some(name) => pipeline
                .position_of(name)
                .ok_or_else(|| MlpipeError::StepNotFound { step: name.clone() })?,
            None => 0,
        };

        for name in &options.steps {
            if pipeline.get_step(name).is_none() {
                return Err(MlpipeError::StepNotFound { step: name.clone() });
            }
        }

        let selected: Vec<usize> = pipeline
            .steps
            .iter()
            .enumerate()
            .skip(first)
            .filter(|(_, step)| options.steps.is_empty() || options.steps.contains(&step.name))
            .map(|(idx, _)| idx)
            .collect();

        if selected.is_empty() {
            let from = options.from.as_deref().unwrap_or_default();
            return Err(MlpipeError::InvalidPipeline {
                reason: format!(
                    "No steps selected: --step {} is before --from {}",
                    options.steps.join(", "),
                    from
                ),
                help: Some(format!("Drop --from or pick steps at or after '{}'", from)),
            });
        }

        Ok(selected)
    }

    fn invalid_transition(state: RunState, action: &str, position: usize) -> MlpipeError {
        MlpipeError::InvalidPipeline {
            reason: format!("cannot {} step {} while {}", action, position, state),
            help: None,
        }
    }
}
