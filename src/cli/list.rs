// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! List command - show the pipeline's steps in execution order

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::load_pipeline;
use crate::utils::print_header;

/// Run the list command
pub async fn run(pipeline_path: Option<PathBuf>, python: &str, verbose: bool) -> Result<()> {
    let loaded = load_pipeline(pipeline_path.as_deref(), python)?;
    let pipeline = &loaded.pipeline;

    print_header(&pipeline.name);
    if let Some(description) = &pipeline.description {
        println!("{}", description.dimmed());
    }
    println!();

    for (idx, step) in pipeline.steps.iter().enumerate() {
        println!("  {}. {}", idx + 1, step.name.bold());
        println!("     {}", format!("$ {}", step.command).cyan());

        let dir = step.resolve_working_dir(&loaded.project_root);
        println!("     {}", format!("in {}", dir.display()).dimmed());

        if verbose {
            if let Some(description) = &step.description {
                println!("     {}", description);
            }
            let mut env: Vec<_> = step.env.iter().collect();
            env.sort();
            for (key, value) in env {
                println!("     {}", format!("{}={}", key, value).dimmed());
            }
        }
    }

    Ok(())
}
