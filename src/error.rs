//! Error types for the shared-asset federation workspace.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions raised by workspace operations.
///
/// Non-fatal outcomes (an occupied link path, nothing to build) are not errors;
/// they travel in the per-operation reports instead.
#[derive(Debug, Error)]
pub enum FederationError {
    #[error("{what} not found: {}", path.display())]
    MissingDirectory { what: &'static str, path: PathBuf },

    #[error("No build manifest in subdomain: {}", path.display())]
    MissingManifest { path: PathBuf },

    #[error("Subdomain already exists: {}. Remove it or set SUBDOMAIN_NAME.", path.display())]
    DuplicateResource { path: PathBuf },

    #[error("{tool} failed with {status}")]
    ExternalToolFailure {
        tool: String,
        status: crate::process::ExitStatus,
    },

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl FederationError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FederationError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this condition.
    ///
    /// A failed external tool hands its own exit code through; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            FederationError::ExternalToolFailure { status, .. } => match status.code() {
                Some(code) if code != 0 => code,
                _ => 1,
            },
            _ => 1,
        }
    }
}

impl From<config::ConfigError> for FederationError {
    fn from(err: config::ConfigError) -> Self {
        FederationError::Config(err.to_string())
    }
}
