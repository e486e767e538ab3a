// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Error recovery suggestions
//!
//! Provides actionable suggestions after a step aborts the pipeline.

/// A recovery suggestion with concrete steps
#[derive(Debug, Clone)]
pub struct RecoverySuggestion {
    /// Brief description of what to do
    pub action: String,
    /// Detailed steps
    pub steps: Vec<String>,
    /// Commands to run
    pub commands: Vec<String>,
}

impl RecoverySuggestion {
    /// Suggest how to recover from a failed step
    ///
    /// `reason` is the captured error text of the failed step.
    pub fn for_step_failure(step: &str, reason: &str) -> Self {
        let mut steps = Vec::new();

        if reason.starts_with("failed to start") {
            steps.push("The step's program could not be launched".into());
            steps.push("Check that it is installed and on your PATH".into());
        } else if reason.contains("status 127") {
            steps.push("The shell could not find the command".into());
            steps.push("Check the spelling and that the tool is installed".into());
        } else if reason.contains("signal") {
            steps.push("The step was killed by a signal".into());
            steps.push("Check memory limits or whether it was interrupted".into());
        } else {
            steps.push("Inspect the step's output above for the cause".into());
        }

        steps.push(
            "Earlier steps are not rolled back; their outputs stay on disk".into(),
        );

        Self {
            action: format!("Fix step '{}' and resume", step),
            steps,
            commands: vec![
                "# Re-run from the failed step:".into(),
                format!("mlpipe run --from {}", quote_if_needed(step)),
            ],
        }
    }
}

/// Quote a step name so the suggested command can be pasted into a shell
fn quote_if_needed(name: &str) -> String {
    let plain = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':'));
    if plain {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', r"'\''"))
    }
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "→ {}", self.action)?;

        for step in &self.steps {
            writeln!(f, "  {}", step)?;
        }

        if !self.commands.is_empty() {
            writeln!(f)?;
            for cmd in &self.commands {
                writeln!(f, "  {}", cmd)?;
            }
        }

        Ok(())
    }
}
