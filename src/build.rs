//! Build orchestration
//!
//! [`BatchBuildOrchestrator`] builds every discovered subdomain one after the
//! other and folds the results into one outcome; a failing subdomain never stops
//! the rest. [`SingleBuildRunner`] builds one subdomain and hands back its exit code.

use crate::config::BuildConfig;
use crate::discovery::{discover, is_buildable, list_child_dirs, subdomain_name};
use crate::error::FederationError;
use crate::process::{ExitStatus, ProcessRunner};
use crate::workspace::{resolve_against, WorkspaceLayout};
use chrono::Utc;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

/// Environment variable that redirects the subdomains root for batch builds.
pub const SUBDOMAINS_DIR_ENV: &str = "SUBDOMAINS_DIR";

/// Subdomains root for a batch: a non-empty override (relative to `cwd`) or the layout's.
pub fn resolve_subdomains_root(
    env_value: Option<OsString>,
    cwd: &Path,
    layout: &WorkspaceLayout,
) -> PathBuf {
    match env_value {
        Some(value) if !value.is_empty() => resolve_against(cwd, Path::new(&value)),
        _ => layout.subdomains_dir.clone(),
    }
}

/// One attempted build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub name: String,
    pub path: PathBuf,
    pub status: ExitStatus,
    pub success: bool,
    pub duration_ms: u64,
    /// Set when the build command could not be launched at all
    pub error: Option<String>,
}

/// Progress notifications, delivered before and after each child runs.
#[derive(Debug)]
pub enum BuildEvent<'a> {
    Started { name: &'a str, path: &'a Path },
    Finished(&'a BuildResult),
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub root: PathBuf,
    pub started_at: String,
    pub results: Vec<BuildResult>,
}

impl BatchReport {
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }

    pub fn exit_code(&self) -> i32 {
        if self.failed_count() > 0 {
            1
        } else {
            0
        }
    }
}

/// Aggregate result of one batch run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum BatchOutcome {
    /// No subdomain directories (or none with a manifest). Not a failure.
    NothingToBuild { root: PathBuf, directories: usize },
    Completed(BatchReport),
}

impl BatchOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            BatchOutcome::NothingToBuild { .. } => 0,
            BatchOutcome::Completed(report) => report.exit_code(),
        }
    }
}

pub struct BatchBuildOrchestrator<'a> {
    build: &'a BuildConfig,
    runner: &'a dyn ProcessRunner,
}

impl<'a> BatchBuildOrchestrator<'a> {
    pub fn new(build: &'a BuildConfig, runner: &'a dyn ProcessRunner) -> Self {
        Self { build, runner }
    }

    /// Build every buildable subdomain under `root`, sequentially.
    pub fn run(
        &self,
        root: &Path,
        mut on_event: impl FnMut(&BuildEvent<'_>),
    ) -> Result<BatchOutcome, FederationError> {
        if !root.exists() {
            return Err(FederationError::MissingDirectory {
                what: "Subdomains directory",
                path: root.to_path_buf(),
            });
        }

        let directories = list_child_dirs(root)?;
        if directories.is_empty() {
            warn!(root = %root.display(), "No subdomain directories found.");
            return Ok(BatchOutcome::NothingToBuild {
                root: root.to_path_buf(),
                directories: 0,
            });
        }

        let buildable = discover(root, &self.build.manifest)?;
        if buildable.is_empty() {
            warn!(
                root = %root.display(),
                manifest = %self.build.manifest,
                "No buildable subdomains found."
            );
            return Ok(BatchOutcome::NothingToBuild {
                root: root.to_path_buf(),
                directories: directories.len(),
            });
        }

        let started_at = Utc::now().to_rfc3339();
        let command = self.build.command_spec();
        let mut results = Vec::with_capacity(buildable.len());

        for dir in &buildable {
            let name = subdomain_name(dir);
            on_event(&BuildEvent::Started { name: &name, path: dir });
            info!(subdomain = %name, "Building subdomain");

            let started = Instant::now();
            let (status, launch_error) = match self.runner.run_streaming(&command, dir) {
                Ok(status) => (status, None),
                Err(e) => {
                    error!(subdomain = %name, error = %e, "Build could not be started");
                    (ExitStatus::Unknown, Some(e.to_string()))
                }
            };
            let result = BuildResult {
                success: launch_error.is_none() && status.is_success(),
                name,
                path: dir.clone(),
                status,
                duration_ms: started.elapsed().as_millis() as u64,
                error: launch_error,
            };
            if !result.success {
                warn!(subdomain = %result.name, status = %result.status, "Subdomain build failed");
            }
            on_event(&BuildEvent::Finished(&result));
            results.push(result);
        }

        Ok(BatchOutcome::Completed(BatchReport {
            root: root.to_path_buf(),
            started_at,
            results,
        }))
    }
}

/// Result of a single-subdomain build.
#[derive(Debug, Clone, Serialize)]
pub struct SingleBuildOutcome {
    pub name: String,
    pub status: ExitStatus,
    /// Exit code for the whole process
    pub exit_code: i32,
}

pub struct SingleBuildRunner<'a> {
    build: &'a BuildConfig,
    runner: &'a dyn ProcessRunner,
}

impl<'a> SingleBuildRunner<'a> {
    pub fn new(build: &'a BuildConfig, runner: &'a dyn ProcessRunner) -> Self {
        Self { build, runner }
    }

    /// Build `subdomain_dir`. Nothing is spawned unless the directory and its
    /// manifest both exist.
    pub fn run(&self, subdomain_dir: &Path) -> Result<SingleBuildOutcome, FederationError> {
        if !subdomain_dir.is_dir() {
            return Err(FederationError::MissingDirectory {
                what: "Subdomain directory",
                path: subdomain_dir.to_path_buf(),
            });
        }
        if !is_buildable(subdomain_dir, &self.build.manifest) {
            return Err(FederationError::MissingManifest {
                path: subdomain_dir.to_path_buf(),
            });
        }

        let name = subdomain_name(subdomain_dir);
        info!(subdomain = %name, "Building subdomain");
        let status = self
            .runner
            .run_streaming(&self.build.command_spec(), subdomain_dir)?;
        let exit_code = status.resolve(self.build.unknown_status);
        info!(subdomain = %name, status = %status, exit_code, "Build finished");

        Ok(SingleBuildOutcome {
            name,
            status,
            exit_code,
        })
    }
}
