// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Init command - write the built-in pipeline to a file

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::pipeline::builtin;
use crate::utils::print_success;
use crate::MlpipeError;

/// Run the init command
pub async fn run(output: PathBuf, force: bool, python: &str) -> Result<()> {
    println!("{}", "Initializing mlpipe project...".bold());
    println!();

    if output.exists() && !force {
        return Err(MlpipeError::FileExists { path: output }.into());
    }

    let pipeline = builtin::ml_pipeline(python);
    let yaml = pipeline.to_yaml()?;

    std::fs::write(&output, yaml).map_err(|e| MlpipeError::FileWriteError {
        path: output.clone(),
        error: e.to_string(),
    })?;

    print_success(&format!("Created {}", output.display()));

    println!();
    println!("Next steps:");
    println!("  1. Edit {} to match your project layout", output.display().to_string().cyan());
    println!("  2. Run {} to check it", "mlpipe validate".cyan());
    println!("  3. Run {} to execute the pipeline", "mlpipe run".cyan());
    println!();

    Ok(())
}
