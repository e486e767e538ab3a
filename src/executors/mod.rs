// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Step runners
//!
//! This module provides the runner trait and the process-backed
//! implementation that launches each step as a child process.

mod process;

pub use process::ProcessRunner;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::pipeline::Step;

/// Result of running one step
///
/// Created once per invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    /// Name of the step that produced this result
    pub step_name: String,

    /// True iff the process exited with status zero
    pub succeeded: bool,

    /// Exit status, or -1 when the process never started or was signalled
    pub exit_status: i32,

    /// Human-readable failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_error: Option<String>,

    /// Wall-clock time spent on the step
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

impl ExecutionResult {
    /// Create a successful result
    pub fn success(step_name: impl Into<String>, duration: Duration) -> Self {
        Self {
            step_name: step_name.into(),
            succeeded: true,
            exit_status: 0,
            captured_error: None,
            duration,
        }
    }

    /// Create a failed result
    pub fn failure(
        step_name: impl Into<String>,
        exit_status: i32,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            step_name: step_name.into(),
            succeeded: false,
            exit_status,
            captured_error: Some(error.into()),
            duration,
        }
    }

    /// Build a result from a raw exit status
    ///
    /// Zero is success; anything else is a failure described by its code.
    pub fn from_exit_status(step_name: impl Into<String>, exit_status: i32, duration: Duration) -> Self {
        if exit_status == 0 {
            Self::success(step_name, duration)
        } else {
            Self::failure(
                step_name,
                exit_status,
                format!("exited with status {}", exit_status),
                duration,
            )
        }
    }

    /// Failure text, or an empty string for successful results
    pub fn error_text(&self) -> &str {
        self.captured_error.as_deref().unwrap_or_default()
    }
}

/// What a runner needs besides the step itself
#[derive(Debug, Clone, Default)]
pub struct StepContext {
    /// Directory that relative working directories resolve against
    pub project_root: PathBuf,

    /// Pipeline-wide environment; step `env` entries override these
    pub env: HashMap<String, String>,
}

impl StepContext {
    /// Create a context rooted at `project_root`
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            env: HashMap::new(),
        }
    }

    /// Effective environment for a step (pipeline env overlaid by step env)
    pub fn env_for(&self, step: &Step) -> HashMap<String, String> {
        let mut env = self.env.clone();
        env.extend(step.env.clone());
        env
    }
}

/// Trait for step runners
///
/// A runner never returns an error: launch failures and non-zero exits are
/// reported through `ExecutionResult::succeeded`.
#[async_trait]
pub trait StepRunner: Send + Sync {
    /// Run a step to completion
    async fn run(&self, step: &Step, context: &StepContext) -> ExecutionResult;
}
