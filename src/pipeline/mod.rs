// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Pipeline definitions and orchestration
//!
//! This module defines pipelines and steps, validates them, and runs them
//! in order with fail-fast semantics.

pub mod builtin;
mod definition;
mod executor;
pub mod progress;
mod report;
mod state;
mod validation;

pub use definition::*;
pub use executor::{ExecutionOptions, PipelineExecutor, PipelineOutcome, PipelineResult};
pub use progress::{ConsoleReporter, ProgressReporter, SilentReporter};
pub use report::RunReport;
pub use state::RunState;
pub use validation::{PipelineValidator, ValidationResult};
