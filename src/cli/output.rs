//! CLI output: command outcome and error mapping to the process surface.

use crate::error::FederationError;

/// What the binary prints and the code it exits with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub output: String,
    pub exit_code: i32,
}

impl CommandOutcome {
    pub fn success(output: String) -> Self {
        Self {
            output,
            exit_code: 0,
        }
    }

    pub fn with_code(output: String, exit_code: i32) -> Self {
        Self { output, exit_code }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Map domain errors to a string for CLI output.
/// Keeps route handlers thin; extend with stable categories if needed.
pub fn map_error(e: &FederationError) -> String {
    e.to_string()
}
