//! Scaffold orchestrator
//!
//! Creates one new subdomain with the external generator, seeds the shared pool
//! from its output on first use, and swaps the generated private copies for links.
//!
//! Only the generator step is fatal. Extraction, release and linking are
//! best-effort per entry; problems are logged and collected in the report.

use crate::config::{is_plain_name, FederationConfig};
use crate::error::FederationError;
use crate::process::ProcessRunner;
use crate::shared::{ensure, ConflictPolicy, Ensured, LinkReport, SharedLinkManager, Wanted};
use crate::tree::remove_tree;
use crate::workspace::WorkspaceLayout;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable that overrides the configured default subdomain name.
pub const SUBDOMAIN_NAME_ENV: &str = "SUBDOMAIN_NAME";

/// Name for the new subdomain: a non-empty override wins over the configured default.
pub fn resolve_subdomain_name(env_value: Option<String>, config: &FederationConfig) -> String {
    env_value
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| config.default_subdomain_name.clone())
}

/// Result of copying one generated entry into the pool.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub name: String,
    pub outcome: Ensured,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldReport {
    pub name: String,
    pub subdomain_dir: PathBuf,
    pub shared_dir: PathBuf,
    /// Shared folders found in the generated `src`, with what happened in the pool
    pub folders: Vec<Extraction>,
    /// Shared single files found in the generated `src`
    pub files: Vec<Extraction>,
    /// Generated private folders removed so they could be linked
    pub released: Vec<String>,
    pub link: Option<LinkReport>,
    /// Non-fatal problems, one line each
    pub problems: Vec<String>,
}

impl ScaffoldReport {
    /// Subdomain path relative to the workspace root, for the build hint.
    pub fn relative_subdomain_dir(&self, root: &Path) -> PathBuf {
        self.subdomain_dir
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| self.subdomain_dir.clone())
    }
}

pub struct ScaffoldOrchestrator<'a> {
    layout: &'a WorkspaceLayout,
    config: &'a FederationConfig,
    runner: &'a dyn ProcessRunner,
}

impl<'a> ScaffoldOrchestrator<'a> {
    pub fn new(
        layout: &'a WorkspaceLayout,
        config: &'a FederationConfig,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        Self {
            layout,
            config,
            runner,
        }
    }

    /// Bootstrap the subdomain `name`.
    ///
    /// Fails before touching anything if the name is unusable or the directory
    /// already exists. A failing generator aborts with its status and leaves the
    /// partial output in place.
    pub fn run(&self, name: &str) -> Result<ScaffoldReport, FederationError> {
        if !is_plain_name(name) {
            return Err(FederationError::InvalidArgument(format!(
                "subdomain name '{}' must be a single path component",
                name
            )));
        }
        let subdomain_dir = self.layout.subdomain_dir(name);
        if fs::symlink_metadata(&subdomain_dir).is_ok() {
            return Err(FederationError::DuplicateResource {
                path: subdomain_dir,
            });
        }

        fs::create_dir_all(&self.layout.subdomains_dir)
            .map_err(|e| FederationError::io(&self.layout.subdomains_dir, e))?;

        let scaffold = &self.config.scaffold;
        info!(
            package = %scaffold.astro_package(),
            template = %scaffold.template,
            subdomain = %name,
            "Creating project"
        );
        let command = scaffold.generator_command(&subdomain_dir);
        let status = self.runner.run_to_completion(&command, &self.layout.root)?;
        if !status.is_success() {
            return Err(FederationError::ExternalToolFailure {
                tool: "create-astro".to_string(),
                status,
            });
        }

        let mut report = ScaffoldReport {
            name: name.to_string(),
            subdomain_dir: subdomain_dir.clone(),
            shared_dir: self.layout.shared_dir.clone(),
            folders: Vec::new(),
            files: Vec::new(),
            released: Vec::new(),
            link: None,
            problems: Vec::new(),
        };

        let src = subdomain_dir.join("src");
        fs::create_dir_all(&self.layout.shared_dir)
            .map_err(|e| FederationError::io(&self.layout.shared_dir, e))?;

        // Only folders the generator produced get linked; the rest stay absent.
        let generated_folders: Vec<String> = self
            .config
            .shared_folders
            .iter()
            .filter(|folder| src.join(folder).is_dir())
            .cloned()
            .collect();

        for folder in &generated_folders {
            let generated = src.join(folder);
            self.extract(folder, &generated, &mut report.folders, &mut report.problems);
        }
        for file in &self.config.shared_files {
            let generated = src.join(file);
            if generated.is_file() {
                self.extract(file, &generated, &mut report.files, &mut report.problems);
            }
        }

        self.release_private_copies(&src, &mut report);

        if src.is_dir() {
            let manager =
                SharedLinkManager::new(self.layout.shared_dir.clone(), generated_folders);
            match manager.link(&src) {
                Ok(link) => {
                    for failed in link.failures() {
                        report.problems.push(format!(
                            "link {}: {}",
                            failed.folder,
                            failed.error.as_deref().unwrap_or("unknown error")
                        ));
                    }
                    report.link = Some(link);
                }
                Err(e) => {
                    warn!(error = %e, "Linking new subdomain failed");
                    report.problems.push(format!("link: {}", e));
                }
            }
        } else {
            warn!(src = %src.display(), "Generated project has no src directory, nothing to link");
            report
                .problems
                .push(format!("no src directory at {}", src.display()));
        }

        info!(subdomain = %name, "Scaffold done");
        Ok(report)
    }

    fn extract(
        &self,
        name: &str,
        generated: &Path,
        extracted: &mut Vec<Extraction>,
        problems: &mut Vec<String>,
    ) {
        let dest = self.layout.shared_dir.join(name);
        match ensure(&dest, Wanted::CopyOf(generated), ConflictPolicy::KeepExisting) {
            Ok(outcome) => {
                match outcome {
                    Ensured::Created => info!("Copied src/{} -> shared/{}", name, name),
                    _ => info!("shared/{} already exists, keeping it", name),
                }
                extracted.push(Extraction {
                    name: name.to_string(),
                    outcome,
                });
            }
            Err(e) => {
                warn!(entry = %name, error = %e, "Extraction into shared pool failed");
                problems.push(format!("extract {}: {}", name, e));
            }
        }
    }

    /// Remove generated real folders whose shared counterpart now exists.
    ///
    /// Folders whose extraction failed are kept so nothing generated is lost.
    fn release_private_copies(&self, src: &Path, report: &mut ScaffoldReport) {
        for extraction in &report.folders {
            let private = src.join(&extraction.name);
            let is_real_dir = fs::symlink_metadata(&private)
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if !is_real_dir || !self.layout.shared_dir.join(&extraction.name).exists() {
                continue;
            }
            match remove_tree(&private) {
                Ok(()) => report.released.push(extraction.name.clone()),
                Err(e) => {
                    warn!(folder = %extraction.name, error = %e, "Could not remove generated copy");
                    report
                        .problems
                        .push(format!("release {}: {}", extraction.name, e));
                }
            }
        }
    }
}
