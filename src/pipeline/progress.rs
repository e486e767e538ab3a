// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Progress markers
//!
//! Markers are for operators reading the console. They never influence
//! control flow.

use colored::Colorize;

use crate::executors::ExecutionResult;
use crate::pipeline::{PipelineOutcome, PipelineResult, Step};

/// Receives progress notifications from the pipeline executor
pub trait ProgressReporter: Send + Sync {
    /// The steps about to run, as (1-based position, step) pairs
    fn plan(&self, _pipeline_name: &str, _steps: &[(usize, &Step)]) {}

    /// A step was left out by `--from` or `--step`
    fn step_skipped(&self, _position: usize, _step: &Step) {}

    /// Emitted before a step's process is launched
    fn step_started(&self, position: usize, total: usize, step: &Step);

    /// Emitted once the step's result is known
    fn step_finished(&self, position: usize, total: usize, step: &Step, result: &ExecutionResult);

    /// Emitted once, after the run reached a terminal state
    fn pipeline_finished(&self, _result: &PipelineResult) {}
}

/// Reporter that prints nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step_started(&self, _position: usize, _total: usize, _step: &Step) {}

    fn step_finished(&self, _: usize, _: usize, _: &Step, _: &ExecutionResult) {}
}

/// Prints STARTING / COMPLETED / FAILED markers to stdout
#[derive(Debug, Default, Clone)]
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a console reporter; `verbose` also echoes each step's command line
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn plan(&self, pipeline_name: &str, steps: &[(usize, &Step)]) {
        println!();
        println!("{}: {}", "Pipeline".bold(), pipeline_name);
        println!("{}", "═".repeat(50));
        println!(
            "Execution plan ({} step{}):",
            steps.len(),
            if steps.len() == 1 { "" } else { "s" }
        );
        println!();

        for (position, step) in steps {
            print!("  {}. {}", position, step.name.bold());
            print!(" {}", format!("[{}]", step.command).dimmed());
            if let Some(dir) = &step.working_dir {
                print!(" {}", format!("(in {})", dir.display()).dimmed());
            }
            println!();
        }

        println!();
    }

    fn step_skipped(&self, position: usize, step: &Step) {
        println!(
            "{} {}",
            "○".dimmed(),
            format!("SKIPPED: {} (step {})", step.name, position).dimmed()
        );
    }

    fn step_started(&self, position: usize, total: usize, step: &Step) {
        println!(
            "{} {} {}",
            "→".blue(),
            format!("STARTING: {}", step.name).bold(),
            format!("[{}/{}]", position, total).dimmed()
        );
        if self.verbose {
            println!("  {}", format!("$ {}", step.command).dimmed());
        }
    }

    fn step_finished(&self, _position: usize, _total: usize, step: &Step, result: &ExecutionResult) {
        if result.succeeded {
            println!(
                "{} {} {}",
                "✓".green(),
                format!("COMPLETED: {}", step.name).green(),
                format!("({:.2}s)", result.duration.as_secs_f64()).dimmed()
            );
            println!();
        } else {
            println!("{} {}", "✗".red(), format!("FAILED: {}", step.name).red().bold());
            for line in result.error_text().lines() {
                println!("  {}", format!("Error: {}", line).red());
            }
        }
    }

    fn pipeline_finished(&self, result: &PipelineResult) {
        let secs = result.duration.as_secs_f64();

        println!();
        match &result.outcome {
            PipelineOutcome::Completed if result.dry_run => {
                println!("{}", "Dry run: no steps were executed".yellow());
            }
            PipelineOutcome::Completed => {
                println!(
                    "{}",
                    format!("Pipeline completed successfully in {:.2}s", secs).green().bold()
                );
            }
            PipelineOutcome::Aborted { position, step, .. } => {
                println!(
                    "{}",
                    format!("Pipeline aborted at step {} ({}) after {:.2}s", position, step, secs)
                        .red()
                        .bold()
                );
            }
        }
    }
}
