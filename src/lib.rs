// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! # mlpipe - fail-fast ML pipeline orchestrator
//!
//! `mlpipe` runs the jobs of a data/ML pipeline (ETL, model training,
//! deployment) as external processes, one at a time, in a fixed order. The
//! first step that fails aborts the run and no later step is started.
//!
//! ## Quick Start
//!
//! ```bash
//! # Show the execution plan
//! mlpipe run --dry-run
//!
//! # Run every step
//! mlpipe run
//!
//! # Resume after fixing a failed step
//! mlpipe run --from 'Training the fraud detection model'
//! ```
//!
//! ## Library use
//!
//! ```no_run
//! use mlpipe::executors::{ProcessRunner, StepContext};
//! use mlpipe::pipeline::{ExecutionOptions, Pipeline, PipelineExecutor, Step, StepCommand};
//!
//! # async fn example() -> mlpipe::MlpipeResult<()> {
//! let pipeline = Pipeline::new("demo")
//!     .with_step(Step::new("etl", StepCommand::exec("python", ["etl.py"])))
//!     .with_step(Step::new("train", StepCommand::exec("python", ["train.py"])));
//!
//! let result = PipelineExecutor::new(ProcessRunner::new())
//!     .execute(&pipeline, &StepContext::new("."), &ExecutionOptions::default())
//!     .await?;
//! assert!(result.success());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod errors;
pub mod executors;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use errors::{MlpipeError, MlpipeResult};
pub use executors::{ExecutionResult, StepRunner};
pub use pipeline::{Pipeline, PipelineExecutor, PipelineOutcome, Step, StepCommand};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
