// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Run state machine
//!
//! `Pending -> Running(i) -> {Running(i+1) | Failed(i)} -> ... -> {Succeeded | Failed}`

use serde::Serialize;

/// State of a pipeline run
///
/// Positions are 1-based indices into the pipeline's declared steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RunState {
    /// Nothing has run yet
    #[default]
    Pending,
    /// The step at `position` is executing
    Running { position: usize },
    /// Every selected step succeeded
    Succeeded,
    /// The step at `position` failed; nothing else runs
    Failed { position: usize },
}

impl RunState {
    /// Whether no further step may run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed { .. })
    }

    /// Move to `Running(position)`
    ///
    /// Only allowed from `Pending` or after the previous step finished
    /// successfully, which is represented by `Running` of an earlier step.
    pub fn start(self, position: usize) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Running { position }),
            Self::Running { position: current } if position > current => {
                Some(Self::Running { position })
            }
            _ => None,
        }
    }

    /// Record the outcome of the running step
    ///
    /// `last` marks the final selected step; its success ends the run.
    pub fn finish(self, succeeded: bool, last: bool) -> Option<Self> {
        match self {
            Self::Running { position } if !succeeded => Some(Self::Failed { position }),
            Self::Running { .. } if last => Some(Self::Succeeded),
            Self::Running { position } => Some(Self::Running { position }),
            _ => None,
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running { position } => write!(f, "running step {}", position),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed { position } => write!(f, "failed at step {}", position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let state = RunState::Pending.start(1).unwrap();
        let state = state.finish(true, false).unwrap();
        let state = state.start(2).unwrap();
        let state = state.finish(true, true).unwrap();
        assert_eq!(state, RunState::Succeeded);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_failure_is_terminal() {
        let state = RunState::Pending.start(1).unwrap().finish(false, false).unwrap();
        assert_eq!(state, RunState::Failed { position: 1 });
        assert!(state.is_terminal());
        assert_eq!(state.start(2), None);
        assert_eq!(state.finish(true, true), None);
    }

    #[test]
    fn test_succeeded_admits_no_step() {
        assert_eq!(RunState::Succeeded.start(1), None);
        assert_eq!(RunState::Succeeded.finish(true, true), None);
    }

    #[test]
    fn test_steps_cannot_go_backwards() {
        let state = RunState::Pending.start(3).unwrap();
        assert_eq!(state.start(2), None);
        assert_eq!(state.start(3), None);
    }

    #[test]
    fn test_finish_requires_running() {
        assert_eq!(RunState::Pending.finish(true, true), None);
    }
}
