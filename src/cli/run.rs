// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Run command - execute the pipeline

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::load_pipeline;
use crate::executors::{ProcessRunner, StepContext};
use crate::pipeline::{
    ConsoleReporter, ExecutionOptions, PipelineExecutor, PipelineValidator, RunReport,
};
use crate::utils::print_info;
use crate::MlpipeError;

/// Arguments for the run command
#[derive(Debug, Default)]
pub struct RunArgs {
    pub pipeline: Option<PathBuf>,
    pub from: Option<String>,
    pub steps: Vec<String>,
    pub dry_run: bool,
    pub report: Option<PathBuf>,
    pub python: String,
}

/// Run the pipeline
pub async fn run(args: RunArgs, verbose: bool) -> Result<()> {
    let loaded = load_pipeline(args.pipeline.as_deref(), &args.python)?;
    let pipeline = &loaded.pipeline;

    // Validate pipeline
    let validation = PipelineValidator::validate(pipeline);

    if !validation.is_valid() {
        eprintln!("{}", "Pipeline validation failed:".red().bold());
        for error in &validation.errors {
            eprintln!("  {} {}", "✗".red(), error);
        }
        return Err(MlpipeError::validation_failed(&validation.errors).into());
    }

    if validation.has_warnings() && verbose {
        eprintln!("{}", "Pipeline warnings:".yellow().bold());
        for warning in &validation.warnings {
            eprintln!("  {} {}", "⚠".yellow(), warning);
        }
        eprintln!();
    }

    let mut context = StepContext::new(&loaded.project_root);
    context.env = pipeline.env.clone();

    let executor =
        PipelineExecutor::new(ProcessRunner::new()).with_reporter(ConsoleReporter::new(verbose));

    let options = ExecutionOptions {
        dry_run: args.dry_run,
        from: args.from,
        steps: args.steps,
    };

    let result = executor.execute(pipeline, &context, &options).await?;

    if let Some(path) = &args.report {
        RunReport::new(&result).write_to(path)?;
        print_info(&format!("Run report written to {}", path.display()));
    }

    result.into_result()?;
    Ok(())
}
