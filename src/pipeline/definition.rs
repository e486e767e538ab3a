// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Pipeline definition structures
//!
//! Defines the schema for .mlpipe.yaml files.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::{MlpipeError, MlpipeResult};

/// Pipeline definition from .mlpipe.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    /// Pipeline version (for future compatibility)
    #[serde(default = "default_version")]
    pub version: String,

    /// Pipeline name
    pub name: String,

    /// Pipeline description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Project root, relative to the directory holding the pipeline file
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Environment variables passed to every step
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    /// Steps in execution order
    pub steps: Vec<Step>,
}

fn default_version() -> String {
    "1".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Pipeline {
    /// Create an empty pipeline with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            name: name.into(),
            description: None,
            root: default_root(),
            env: HashMap::new(),
            steps: Vec::new(),
        }
    }

    /// Append a step
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Load pipeline from a YAML or TOML file (chosen by extension)
    pub fn from_file(path: &Path) -> MlpipeResult<Self> {
        if !path.exists() {
            return Err(MlpipeError::PipelineNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| MlpipeError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Parse pipeline from YAML string
    pub fn from_yaml(yaml: &str) -> MlpipeResult<Self> {
        serde_yaml::from_str(yaml).map_err(Into::into)
    }

    /// Parse pipeline from TOML string
    pub fn from_toml(content: &str) -> MlpipeResult<Self> {
        toml::from_str(content).map_err(Into::into)
    }

    /// Serialize pipeline to YAML
    pub fn to_yaml(&self) -> MlpipeResult<String> {
        serde_yaml::to_string(self).map_err(Into::into)
    }

    /// Get a step by name
    pub fn get_step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Zero-based index of a step
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.name == name)
    }

    /// Get all step names
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    /// Resolve the project root against the pipeline file's directory
    pub fn project_root(&self, base_dir: &Path) -> PathBuf {
        if self.root.is_absolute() {
            self.root.clone()
        } else if self.root == Path::new(".") {
            base_dir.to_path_buf()
        } else {
            base_dir.join(&self.root)
        }
    }
}

/// A single pipeline step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Human-readable step name (unique within the pipeline)
    pub name: String,

    /// Longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// What to run
    #[serde(deserialize_with = "deserialize_command")]
    pub command: StepCommand,

    /// Directory to run in, relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,

    /// Environment variables for this step only
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
}

impl Step {
    /// Create a step
    pub fn new(name: impl Into<String>, command: StepCommand) -> Self {
        Self {
            name: name.into(),
            description: None,
            command,
            working_dir: None,
            env: HashMap::new(),
        }
    }

    /// Set the working directory
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Add a step-scoped environment variable
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Directory the step's process runs in
    pub fn resolve_working_dir(&self, project_root: &Path) -> PathBuf {
        match &self.working_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => project_root.join(dir),
            None => project_root.to_path_buf(),
        }
    }
}

/// How a step's process is launched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StepCommand {
    /// Run a program directly with an argument list
    Exec {
        /// Program name or path
        program: String,

        /// Arguments, passed without shell interpretation
        #[serde(default)]
        args: Vec<String>,
    },

    /// Run a script through a shell
    Shell {
        /// Script passed to `<shell> -c`
        script: String,

        /// Shell to use (sh, bash, ...)
        #[serde(default = "default_shell")]
        shell: String,
    },
}

fn default_shell() -> String {
    "sh".to_string()
}

impl StepCommand {
    /// Build an exec command from a program and its arguments
    pub fn exec<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Exec {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a shell command run through `sh`
    pub fn shell(script: impl Into<String>) -> Self {
        Self::Shell {
            script: script.into(),
            shell: default_shell(),
        }
    }

    /// The executable that will be spawned
    pub fn program(&self) -> &str {
        match self {
            Self::Exec { program, .. } => program,
            Self::Shell { shell, .. } => shell,
        }
    }

    /// Arguments handed to the executable
    pub fn argv(&self) -> Vec<&str> {
        match self {
            Self::Exec { args, .. } => args.iter().map(String::as_str).collect(),
            Self::Shell { script, .. } => vec!["-c", script.as_str()],
        }
    }

    /// Whether there is nothing to run
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Exec { program, .. } => program.trim().is_empty(),
            Self::Shell { script, shell } => script.trim().is_empty() || shell.trim().is_empty(),
        }
    }
}

impl std::fmt::Display for StepCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exec { program, args } => {
                write!(f, "{}", quote_arg(program))?;
                for arg in args {
                    write!(f, " {}", quote_arg(arg))?;
                }
                Ok(())
            }
            Self::Shell { script, shell } => write!(f, "{} -c {}", shell, quote_arg(script)),
        }
    }
}

fn quote_arg(arg: &str) -> String {
    if arg.is_empty() || arg.contains(char::is_whitespace) {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.to_string()
    }
}

/// Accepts either the tagged form or a bare `[program, args...]` list
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCommand {
    Argv(Vec<String>),
    Tagged(StepCommand),
}

fn deserialize_command<'de, D>(deserializer: D) -> Result<StepCommand, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawCommand::deserialize(deserializer)? {
        RawCommand::Argv(mut argv) => {
            let program = if argv.is_empty() {
                String::new()
            } else {
                argv.remove(0)
            };
            StepCommand::Exec { program, args: argv }
        }
        RawCommand::Tagged(cmd) => cmd,
    })
}
