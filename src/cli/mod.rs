// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for mlpipe.

pub mod init;
pub mod list;
pub mod run;
pub mod validate;

use clap::{Parser, Subcommand};
use miette::Result;
use std::path::{Path, PathBuf};

use crate::pipeline::{builtin, Pipeline};
use crate::utils::print_info;

/// Default pipeline file name
pub const DEFAULT_PIPELINE_FILE: &str = ".mlpipe.yaml";

/// Fail-fast ML pipeline orchestrator
///
/// Runs ETL, training, and deployment jobs in order and stops at the
/// first failure.
#[derive(Parser, Debug)]
#[clap(
    name = "mlpipe",
    version,
    about = "Fail-fast orchestrator for ETL, model training, and deployment jobs",
    long_about = None,
    after_help = "Examples:\n\
        mlpipe run                      Run the pipeline\n\
        mlpipe run --dry-run            Show the execution plan\n\
        mlpipe run --from train         Resume at the 'train' step\n\
        mlpipe init                     Write the built-in pipeline to .mlpipe.yaml\n\n\
        See 'mlpipe <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Python interpreter for the built-in pipeline
    #[clap(
        long,
        global = true,
        env = "MLPIPE_PYTHON",
        default_value = builtin::DEFAULT_PYTHON,
        value_name = "INTERPRETER"
    )]
    pub python: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline
    Run {
        /// Pipeline file (defaults to .mlpipe.yaml, then the built-in pipeline)
        #[clap(short, long, env = "MLPIPE_PIPELINE")]
        pipeline: Option<PathBuf>,

        /// Start at this step, skipping earlier ones
        #[clap(long, value_name = "STEP")]
        from: Option<String>,

        /// Run only specific steps
        #[clap(short, long, value_name = "STEP")]
        step: Vec<String>,

        /// Dry run (show what would be done)
        #[clap(long)]
        dry_run: bool,

        /// Write a JSON run report to this path
        #[clap(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Validate pipeline configuration
    Validate {
        /// Pipeline file to validate
        #[clap(short, long, env = "MLPIPE_PIPELINE")]
        pipeline: Option<PathBuf>,
    },

    /// List the pipeline's steps
    List {
        /// Pipeline file
        #[clap(short, long, env = "MLPIPE_PIPELINE")]
        pipeline: Option<PathBuf>,
    },

    /// Write the built-in pipeline to a file
    Init {
        /// Output file
        #[clap(short, long, default_value = DEFAULT_PIPELINE_FILE)]
        output: PathBuf,

        /// Overwrite an existing file
        #[clap(short, long)]
        force: bool,
    },
}

/// A pipeline together with the directory its relative paths resolve from
#[derive(Debug)]
pub struct LoadedPipeline {
    pub pipeline: Pipeline,
    pub project_root: PathBuf,
    /// File it came from, or `None` for the built-in pipeline
    pub source: Option<PathBuf>,
}

/// Load the pipeline a command should operate on
///
/// An explicit path must exist. Without one, `.mlpipe.yaml` in the current
/// directory is used if present, otherwise the built-in pipeline.
pub fn load_pipeline(path: Option<&Path>, python: &str) -> Result<LoadedPipeline> {
    let cwd = std::env::current_dir()
        .map_err(|e| miette::miette!("Failed to get current directory: {}", e))?;

    let file = match path {
        Some(p) => Some(p.to_path_buf()),
        None => {
            let default = cwd.join(DEFAULT_PIPELINE_FILE);
            default.exists().then_some(default)
        }
    };

    let Some(file) = file else {
        print_info(&format!(
            "No {} found, using the built-in pipeline",
            DEFAULT_PIPELINE_FILE
        ));
        let pipeline = builtin::ml_pipeline(python);
        let project_root = pipeline.project_root(&cwd);
        return Ok(LoadedPipeline {
            pipeline,
            project_root,
            source: None,
        });
    };

    let pipeline = Pipeline::from_file(&file)?;

    let file = if file.is_absolute() { file } else { cwd.join(file) };
    let base_dir = file.parent().map(Path::to_path_buf).unwrap_or(cwd);
    let project_root = pipeline.project_root(&base_dir);

    Ok(LoadedPipeline {
        pipeline,
        project_root,
        source: Some(file),
    })
}
