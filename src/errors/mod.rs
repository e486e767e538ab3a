// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Error types
//!
//! Configuration problems are reported as `MlpipeError` diagnostics. A step
//! that exits non-zero is not an error at the runner level: it produces an
//! `ExecutionResult` with `succeeded = false`, and only the CLI turns the
//! aborted run into `MlpipeError::StepFailed`.

mod recovery;

pub use recovery::RecoverySuggestion;

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for mlpipe operations
pub type MlpipeResult<T> = Result<T, MlpipeError>;

/// Main error type for mlpipe
#[derive(Error, Debug, Diagnostic)]
pub enum MlpipeError {
    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Pipeline file not found: {path}")]
    #[diagnostic(
        code(mlpipe::pipeline_not_found),
        help("Create one with 'mlpipe init' or pass --pipeline <FILE>")
    )]
    PipelineNotFound { path: PathBuf },

    #[error("Invalid pipeline configuration: {reason}")]
    #[diagnostic(code(mlpipe::invalid_pipeline))]
    InvalidPipeline {
        reason: String,
        #[help]
        help: Option<String>,
    },

    #[error("Step '{step}' not found in pipeline")]
    #[diagnostic(
        code(mlpipe::step_not_found),
        help("Run 'mlpipe list' to see the defined steps")
    )]
    StepNotFound { step: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Execution Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Pipeline aborted at step {position} ('{step}'): {reason}")]
    #[diagnostic(code(mlpipe::step_failed))]
    StepFailed {
        step: String,
        position: usize,
        reason: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // File Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(mlpipe::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(mlpipe::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    #[error("Refusing to overwrite existing file: {path}")]
    #[diagnostic(code(mlpipe::file_exists), help("Pass --force to overwrite it"))]
    FileExists { path: PathBuf },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(mlpipe::io_error))]
    Io { message: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(mlpipe::yaml_error))]
    Yaml { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(mlpipe::json_error))]
    Json { message: String },

    #[error("TOML parsing error: {message}")]
    #[diagnostic(code(mlpipe::toml_error))]
    Toml { message: String },
}

impl From<std::io::Error> for MlpipeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for MlpipeError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for MlpipeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<toml::de::Error> for MlpipeError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl MlpipeError {
    /// Create a step failed error carrying a recovery hint
    pub fn step_failed(step: &str, position: usize, reason: &str) -> Self {
        let suggestion = RecoverySuggestion::for_step_failure(step, reason);
        Self::StepFailed {
            step: step.to_string(),
            position,
            reason: Self::first_line(reason),
            help: Some(suggestion.to_string().trim_end().to_string()),
        }
    }

    /// Create an invalid pipeline error from a list of validation errors
    pub fn validation_failed(errors: &[String]) -> Self {
        Self::InvalidPipeline {
            reason: format!("{} error(s) found", errors.len()),
            help: Some(errors.join("\n")),
        }
    }

    fn first_line(text: &str) -> String {
        text.lines().next().unwrap_or_default().to_string()
    }
}
