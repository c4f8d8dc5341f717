//! External process capability
//!
//! Orchestrators never touch `std::process` directly. They receive a
//! [`ProcessRunner`] so tests can substitute a scripted runner.

use crate::error::FederationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Termination status of a child process.
///
/// `Unknown` covers children that ended without an exit code (killed by a signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitStatus {
    Code(i32),
    Unknown,
}

impl ExitStatus {
    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Code(code) => Some(*code),
            ExitStatus::Unknown => None,
        }
    }

    /// Only an explicit zero counts as success.
    pub fn is_success(&self) -> bool {
        matches!(self, ExitStatus::Code(0))
    }

    /// Exit code to hand to the parent process.
    pub fn resolve(&self, policy: UnknownStatusPolicy) -> i32 {
        match (self, policy) {
            (ExitStatus::Code(code), _) => *code,
            (ExitStatus::Unknown, UnknownStatusPolicy::Success) => 0,
            (ExitStatus::Unknown, UnknownStatusPolicy::Failure) => 1,
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Code(code) => write!(f, "exit status {}", code),
            ExitStatus::Unknown => write!(f, "unknown exit status"),
        }
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        match status.code() {
            Some(code) => ExitStatus::Code(code),
            None => ExitStatus::Unknown,
        }
    }
}

/// How a single build maps a child that ended without an exit code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownStatusPolicy {
    /// Treat as exit code 0.
    #[default]
    Success,
    /// Treat as exit code 1.
    Failure,
}

/// Capability for launching external commands.
pub trait ProcessRunner {
    /// Run and block until the child exits. Output goes straight to the operator.
    fn run_to_completion(&self, cmd: &CommandSpec, cwd: &Path)
        -> Result<ExitStatus, FederationError>;

    /// Spawn with live output and wait for the child before returning, so
    /// consecutive invocations never interleave.
    fn run_streaming(&self, cmd: &CommandSpec, cwd: &Path) -> Result<ExitStatus, FederationError>;
}

/// Runner backed by real child processes with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(cmd: &CommandSpec, cwd: &Path) -> Command {
        let mut command = Command::new(&cmd.program);
        command
            .args(&cmd.args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }

    fn spawn_error(cmd: &CommandSpec, source: std::io::Error) -> FederationError {
        FederationError::Spawn {
            program: cmd.program.clone(),
            source,
        }
    }
}

impl ProcessRunner for SystemRunner {
    fn run_to_completion(
        &self,
        cmd: &CommandSpec,
        cwd: &Path,
    ) -> Result<ExitStatus, FederationError> {
        debug!(command = %cmd, cwd = %cwd.display(), "Running command to completion");
        let status = Self::command(cmd, cwd)
            .status()
            .map_err(|e| Self::spawn_error(cmd, e))?;
        Ok(status.into())
    }

    fn run_streaming(&self, cmd: &CommandSpec, cwd: &Path) -> Result<ExitStatus, FederationError> {
        debug!(command = %cmd, cwd = %cwd.display(), "Spawning streaming command");
        let mut child = Self::command(cmd, cwd)
            .spawn()
            .map_err(|e| Self::spawn_error(cmd, e))?;
        let status = child.wait().map_err(|e| Self::spawn_error(cmd, e))?;
        Ok(status.into())
    }
}
