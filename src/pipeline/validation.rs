// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Pipeline validation
//!
//! Validates pipeline configuration before execution.

use std::collections::HashSet;
use std::path::Path;

use crate::pipeline::{Pipeline, Step, StepCommand};

/// Pipeline validator
pub struct PipelineValidator;

impl PipelineValidator {
    /// Validate a pipeline configuration
    pub fn validate(pipeline: &Pipeline) -> ValidationResult {
        let mut result = ValidationResult::new();

        if pipeline.name.trim().is_empty() {
            result.add_error("Pipeline name is empty");
        }

        if pipeline.steps.is_empty() {
            result.add_error("Pipeline has no steps defined");
        }

        let mut seen_names = HashSet::new();
        for step in &pipeline.steps {
            if !seen_names.insert(&step.name) {
                result.add_error(&format!("Duplicate step name: '{}'", step.name));
            }
        }

        for (idx, step) in pipeline.steps.iter().enumerate() {
            Self::validate_step(idx + 1, step, &mut result);
        }

        result
    }

    /// Validate a single step
    fn validate_step(position: usize, step: &Step, result: &mut ValidationResult) {
        if step.name.trim().is_empty() {
            result.add_error(&format!("Step {}: name is empty", position));
        }

        match &step.command {
            StepCommand::Exec { program, .. } if program.trim().is_empty() => {
                result.add_error(&format!("Step '{}': program is empty", step.name));
            }
            StepCommand::Shell { script, .. } if script.trim().is_empty() => {
                result.add_error(&format!("Step '{}': shell script is empty", step.name));
            }
            StepCommand::Shell { shell, .. } if shell.trim().is_empty() => {
                result.add_error(&format!("Step '{}': shell is empty", step.name));
            }
            StepCommand::Exec { program, args } if args.is_empty() && program.contains(' ') => {
                result.add_warning(&format!(
                    "Step '{}': program '{}' contains spaces. \
                     Put arguments in 'args' or use a shell command.",
                    step.name, program
                ));
            }
            _ => {}
        }
    }

    /// Check the environment the pipeline will run in
    ///
    /// Returns warnings only: a missing tool may be installed before the
    /// step runs, and the step will fail on its own if it is not.
    pub fn validate_environment(pipeline: &Pipeline, project_root: &Path) -> Vec<String> {
        let mut warnings = Vec::new();

        if !project_root.is_dir() {
            warnings.push(format!(
                "Project root does not exist: {}",
                project_root.display()
            ));
        }

        for step in &pipeline.steps {
            let program = step.command.program();
            let step_dir = step.resolve_working_dir(project_root);
            if !program.is_empty() && !Self::program_available(program, &step_dir) {
                warnings.push(format!(
                    "Step '{}': program '{}' not found on PATH",
                    step.name, program
                ));
            }

            if step.working_dir.is_some() {
                let dir = step.resolve_working_dir(project_root);
                if !dir.is_dir() {
                    warnings.push(format!(
                        "Step '{}': working directory not found: {}",
                        step.name,
                        dir.display()
                    ));
                }
            }
        }

        warnings
    }

    /// Relative paths resolve from the directory the step runs in
    fn program_available(program: &str, step_dir: &Path) -> bool {
        if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
            let path = Path::new(program);
            let full = if path.is_absolute() {
                path.to_path_buf()
            } else {
                step_dir.join(path)
            };
            return full.is_file();
        }

        which::which(program).is_ok()
    }
}

/// Result of pipeline validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    pub fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
