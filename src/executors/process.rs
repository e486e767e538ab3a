// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Process runner
//!
//! Launches a step as a child process and waits for it to exit. stdout is
//! inherited so collaborator output reaches the operator unchanged; stderr is
//! echoed through and its last lines are kept for the failure report.
//! Reading stderr stops shortly after the child exits, even when a process it
//! left running in the background still holds the pipe.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io::Write;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use super::{ExecutionResult, StepContext, StepRunner};
use crate::pipeline::Step;

/// Number of stderr lines kept for `captured_error`
const DEFAULT_TAIL_LINES: usize = 20;

/// How long stderr may keep draining once the step's own process has exited
const STDERR_DRAIN: Duration = Duration::from_millis(500);

/// Runs steps as child processes
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    tail_lines: usize,
    echo_stderr: bool,
}

impl ProcessRunner {
    /// Create a new process runner
    pub fn new() -> Self {
        Self {
            tail_lines: DEFAULT_TAIL_LINES,
            echo_stderr: true,
        }
    }

    /// Keep at most `lines` of stderr in failure reports
    pub fn with_tail_lines(mut self, lines: usize) -> Self {
        self.tail_lines = lines;
        self
    }

    /// Stop echoing child stderr to our own stderr
    pub fn quiet(mut self) -> Self {
        self.echo_stderr = false;
        self
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StepRunner for ProcessRunner {
    async fn run(&self, step: &Step, context: &StepContext) -> ExecutionResult {
        let start = Instant::now();
        let working_dir = step.resolve_working_dir(&context.project_root);

        if step.command.is_empty() {
            return ExecutionResult::failure(&step.name, -1, "command is empty", start.elapsed());
        }

        if !working_dir.is_dir() {
            return ExecutionResult::failure(
                &step.name,
                -1,
                format!("working directory '{}' does not exist", working_dir.display()),
                start.elapsed(),
            );
        }

        let program = step.command.program();
        let mut cmd = Command::new(program);
        cmd.args(step.command.argv())
            .current_dir(&working_dir)
            .envs(context.env_for(step))
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            step = %step.name,
            command = %step.command,
            dir = %working_dir.display(),
            "spawning step process"
        );

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(step = %step.name, error = %e, "failed to start step process");
                return ExecutionResult::failure(
                    &step.name,
                    -1,
                    format!("failed to start '{}': {}", program, e),
                    start.elapsed(),
                );
            }
        };

        let tail = Arc::new(Mutex::new(VecDeque::with_capacity(self.tail_lines)));
        let mut reader = tokio::spawn(collect_tail(
            child.stderr.take(),
            Arc::clone(&tail),
            self.tail_lines,
            self.echo_stderr,
        ));

        let status = child.wait().await;
        let duration = start.elapsed();

        // Background processes started by the step can hold stderr open.
        if tokio::time::timeout(STDERR_DRAIN, &mut reader).await.is_err() {
            debug!(step = %step.name, "stderr still open after exit, detaching");
            reader.abort();
        }

        let tail: Vec<String> = tail
            .lock()
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default();

        match status {
            Ok(status) if status.success() => ExecutionResult::success(&step.name, duration),
            Ok(status) => {
                let mut error = describe_status(status);
                if !tail.is_empty() {
                    error.push('\n');
                    error.push_str(&tail.join("\n"));
                }
                ExecutionResult::failure(&step.name, status.code().unwrap_or(-1), error, duration)
            }
            Err(e) => ExecutionResult::failure(
                &step.name,
                -1,
                format!("failed waiting for '{}': {}", program, e),
                duration,
            ),
        }
    }
}

/// Drain a stream, echoing each line and keeping the last `limit` lines
async fn collect_tail<R>(
    stream: Option<R>,
    tail: Arc<Mutex<VecDeque<String>>>,
    limit: usize,
    echo: bool,
) where
    R: AsyncRead + Unpin + Send + 'static,
{
    let Some(stream) = stream else {
        return;
    };

    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).trim_end().to_string();
                if echo {
                    echo_line(&mut std::io::stderr(), &line);
                }
                if limit > 0 {
                    if let Ok(mut tail) = tail.lock() {
                        if tail.len() == limit {
                            tail.pop_front();
                        }
                        tail.push_back(line);
                    }
                }
            }
            Err(e) => {
                debug!(error = %e, "stopped reading step stderr");
                break;
            }
        }
    }
}

/// Write one echoed line, ignoring a closed stderr
fn echo_line(out: &mut impl Write, line: &str) {
    let _ = writeln!(out, "{}", line);
}

fn describe_status(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exited with status {}", code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("terminated by signal {}", signal);
        }
    }

    "terminated abnormally".to_string()
}
