// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! JSON run report

use serde::Serialize;
use std::path::Path;

use crate::errors::{MlpipeError, MlpipeResult};
use crate::executors::ExecutionResult;
use crate::pipeline::{PipelineOutcome, PipelineResult, RunState};

/// Machine-readable summary of a run
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub pipeline: &'a str,
    pub outcome: &'static str,
    pub state: RunState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<&'a str>,
    pub duration_ms: u64,
    pub dry_run: bool,
    pub steps: &'a [ExecutionResult],
    pub skipped: &'a [String],
}

impl<'a> RunReport<'a> {
    /// Build a report borrowing from a finished run
    pub fn new(result: &'a PipelineResult) -> Self {
        let (outcome, failed_step) = match &result.outcome {
            PipelineOutcome::Completed => ("completed", None),
            PipelineOutcome::Aborted { step, .. } => ("aborted", Some(step.as_str())),
        };

        Self {
            pipeline: &result.pipeline_name,
            outcome,
            state: result.state,
            failed_step,
            duration_ms: result.duration.as_millis() as u64,
            dry_run: result.dry_run,
            steps: &result.results,
            skipped: &result.skipped,
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> MlpipeResult<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Write the report, creating parent directories as needed
    pub fn write_to(&self, path: &Path) -> MlpipeResult<()> {
        let json = self.to_json()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| MlpipeError::FileWriteError {
                path: parent.to_path_buf(),
                error: e.to_string(),
            })?;
        }

        std::fs::write(path, json).map_err(|e| MlpipeError::FileWriteError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }
}
