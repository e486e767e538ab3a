// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Validate command - check pipeline configuration

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::load_pipeline;
use crate::pipeline::PipelineValidator;
use crate::utils::{print_error, print_section, print_success, print_warning};

/// Run the validate command
pub async fn run(pipeline_path: Option<PathBuf>, python: &str, verbose: bool) -> Result<()> {
    println!("{}", "Validating pipeline...".bold());
    println!();

    let loaded = match load_pipeline(pipeline_path.as_deref(), python) {
        Ok(loaded) => loaded,
        Err(e) => {
            print_error("Failed to load pipeline");
            eprintln!();
            return Err(e);
        }
    };
    let pipeline = &loaded.pipeline;

    if let Some(source) = &loaded.source {
        print_success(&format!("{} parsed", source.display()));
    }

    let validation = PipelineValidator::validate(pipeline);
    let environment = PipelineValidator::validate_environment(pipeline, &loaded.project_root);

    if !validation.errors.is_empty() {
        print_section(&"Errors".red().bold().to_string());
        for error in &validation.errors {
            print_error(error);
        }
    }

    if validation.has_warnings() || !environment.is_empty() {
        print_section(&"Warnings".yellow().bold().to_string());
        for warning in validation.warnings.iter().chain(environment.iter()) {
            print_warning(warning);
        }
    }

    if verbose {
        print_section("Pipeline summary");
        println!("  Name: {}", pipeline.name);
        println!("  Project root: {}", loaded.project_root.display());
        println!("  Steps: {}", pipeline.steps.len());
        for step in &pipeline.steps {
            println!("    - {} {}", step.name, format!("[{}]", step.command).dimmed());
        }
    }

    println!();

    if !validation.is_valid() {
        return Err(miette::miette!("Pipeline validation failed"));
    }

    if validation.has_warnings() || !environment.is_empty() {
        println!("{}", "Pipeline is valid but has warnings.".yellow().bold());
    } else {
        println!("{}", "Pipeline is valid!".green().bold());
    }

    Ok(())
}
