//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::build::{
    resolve_subdomains_root, BatchBuildOrchestrator, BuildEvent, SingleBuildRunner,
    SUBDOMAINS_DIR_ENV,
};
use crate::cli::output::CommandOutcome;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_batch_outcome_text, format_build_header, format_link_report, format_scaffold_report,
    format_single_build, format_status_text, to_json,
};
use crate::config::{ConfigLoader, FederationConfig};
use crate::error::FederationError;
use crate::process::{ProcessRunner, SystemRunner};
use crate::scaffold::{resolve_subdomain_name, ScaffoldOrchestrator, SUBDOMAIN_NAME_ENV};
use crate::shared::SharedLinkManager;
use crate::workspace::{resolve_against, TopologyStatus, WorkspaceLayout};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment captured once when the context is built.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// SUBDOMAINS_DIR
    pub subdomains_dir: Option<OsString>,
    /// SUBDOMAIN_NAME
    pub subdomain_name: Option<String>,
    /// Base for paths given relative to the current directory
    pub cwd: PathBuf,
}

impl Overrides {
    pub fn from_env() -> Result<Self, FederationError> {
        let cwd = std::env::current_dir().map_err(|e| FederationError::io(".", e))?;
        Ok(Self {
            subdomains_dir: std::env::var_os(SUBDOMAINS_DIR_ENV),
            subdomain_name: std::env::var(SUBDOMAIN_NAME_ENV).ok(),
            cwd,
        })
    }
}

/// Runtime context for CLI execution: resolved config, layout and process runner.
pub struct RunContext {
    config: FederationConfig,
    layout: WorkspaceLayout,
    runner: Box<dyn ProcessRunner>,
    overrides: Overrides,
    /// Print batch headers as builds start
    live_output: bool,
}

impl RunContext {
    /// Create run context from workspace root and optional config path, launching real processes.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
    ) -> Result<Self, FederationError> {
        let config = Self::load_config(&workspace_root, config_path.as_deref())?;
        let layout = WorkspaceLayout::resolve(&workspace_root, &config)?;
        Ok(Self {
            config,
            layout,
            runner: Box::new(SystemRunner),
            overrides: Overrides::from_env()?,
            live_output: true,
        })
    }

    /// Context with an explicit runner and environment, for embedding and tests.
    pub fn with_runner(
        config: FederationConfig,
        layout: WorkspaceLayout,
        runner: Box<dyn ProcessRunner>,
        overrides: Overrides,
    ) -> Self {
        Self {
            config,
            layout,
            runner,
            overrides,
            live_output: false,
        }
    }

    pub fn load_config(
        workspace_root: &Path,
        config_path: Option<&Path>,
    ) -> Result<FederationConfig, FederationError> {
        match config_path {
            Some(path) => ConfigLoader::load_from_file(path),
            None => ConfigLoader::load(workspace_root),
        }
    }

    pub fn config(&self) -> &FederationConfig {
        &self.config
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutcome, FederationError> {
        match command {
            Commands::BuildAll { format } => self.handle_build_all(format),
            Commands::BuildOne { path } => self.handle_build_one(path),
            Commands::Scaffold { name } => self.handle_scaffold(name.as_deref()),
            Commands::LinkShared { subdomain, shared } => {
                self.handle_link_shared(subdomain, shared.as_deref())
            }
            Commands::Status { format } => self.handle_status(format),
        }
    }

    fn handle_build_all(&self, format: &str) -> Result<CommandOutcome, FederationError> {
        let root = resolve_subdomains_root(
            self.overrides.subdomains_dir.clone(),
            &self.overrides.cwd,
            &self.layout,
        );
        let print_headers = self.live_output && format != "json";
        let orchestrator = BatchBuildOrchestrator::new(&self.config.build, self.runner.as_ref());
        let outcome = orchestrator.run(&root, |event| {
            if let BuildEvent::Started { name, .. } = event {
                if print_headers {
                    println!("{}", format_build_header(name));
                    let _ = std::io::stdout().flush();
                }
            }
        })?;

        let output = if format == "json" {
            to_json(&outcome)?
        } else {
            format_batch_outcome_text(&outcome)
        };
        Ok(CommandOutcome::with_code(output, outcome.exit_code()))
    }

    fn handle_build_one(&self, path: &Path) -> Result<CommandOutcome, FederationError> {
        let subdomain_dir = self.layout.resolve_subdomain_path(path);
        let runner = SingleBuildRunner::new(&self.config.build, self.runner.as_ref());
        let outcome = runner.run(&subdomain_dir)?;
        Ok(CommandOutcome::with_code(
            format_single_build(&outcome),
            outcome.exit_code,
        ))
    }

    fn handle_scaffold(&self, name: Option<&str>) -> Result<CommandOutcome, FederationError> {
        let name = match name {
            Some(name) => name.to_string(),
            None => resolve_subdomain_name(self.overrides.subdomain_name.clone(), &self.config),
        };
        let orchestrator =
            ScaffoldOrchestrator::new(&self.layout, &self.config, self.runner.as_ref());
        let report = orchestrator.run(&name)?;
        Ok(CommandOutcome::success(format_scaffold_report(
            &report,
            &self.layout.root,
        )))
    }

    fn handle_link_shared(
        &self,
        subdomain: &Path,
        shared: Option<&Path>,
    ) -> Result<CommandOutcome, FederationError> {
        let subdomain_dir = self.layout.resolve_subdomain_path(subdomain);
        let shared_dir = match shared {
            Some(path) => resolve_against(&self.overrides.cwd, path),
            None => self.layout.shared_dir.clone(),
        };
        let manager = SharedLinkManager::new(shared_dir, self.config.shared_folders.clone());
        let report = manager.link_subdomain(&subdomain_dir)?;
        let exit_code = if report.failures().next().is_some() { 1 } else { 0 };
        Ok(CommandOutcome::with_code(
            format_link_report(&report),
            exit_code,
        ))
    }

    fn handle_status(&self, format: &str) -> Result<CommandOutcome, FederationError> {
        let status = TopologyStatus::collect(
            &self.layout,
            &self.config.shared_folders,
            &self.config.build.manifest,
        )?;
        let output = if format == "json" {
            to_json(&status)?
        } else {
            format_status_text(&status)
        };
        Ok(CommandOutcome::success(output))
    }
}
