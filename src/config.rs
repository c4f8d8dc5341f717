//! Configuration System
//!
//! Workspace configuration resolved once at startup: where the shared pool and
//! the subdomains live, which folders are shareable, and how the external
//! generator and build tools are invoked. Layered with the `config` crate.

use crate::logging::LoggingConfig;
use crate::process::{CommandSpec, UnknownStatusPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::package_manifest::{PACKAGE_MANIFEST, SECTION};
pub use sources::workspace_file::WORKSPACE_CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederationConfig {
    /// Shared asset pool, relative to the workspace root unless absolute
    #[serde(default = "default_shared_dir")]
    pub shared_dir: PathBuf,

    /// Directory holding one subdirectory per subdomain
    #[serde(default = "default_subdomains_dir")]
    pub subdomains_dir: PathBuf,

    /// Name used by `scaffold` when SUBDOMAIN_NAME is not set
    #[serde(default = "default_subdomain_name")]
    pub default_subdomain_name: String,

    /// Folder names under `src/` that are hoisted into the pool, in link order
    #[serde(default = "default_shared_folders")]
    pub shared_folders: Vec<String>,

    /// Single files under `src/` copied into the pool on first scaffold
    #[serde(default = "default_shared_files")]
    pub shared_files: Vec<String>,

    #[serde(default)]
    pub scaffold: ScaffoldConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Options for the external project generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    #[serde(default = "default_astro_version")]
    pub astro_version: String,

    #[serde(default = "default_template")]
    pub template: String,

    /// Type-check strictness passed to the generator
    #[serde(default = "default_typescript")]
    pub typescript: String,

    /// Install dependencies after generating
    #[serde(default = "default_true")]
    pub install: bool,

    /// Initialize version control in the new subdomain
    #[serde(default)]
    pub git: bool,

    /// Package manager used to launch the generator
    #[serde(default = "default_package_manager")]
    pub command: String,
}

/// How a subdomain is built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_package_manager")]
    pub command: String,

    #[serde(default = "default_build_args")]
    pub args: Vec<String>,

    /// File whose presence marks a directory as a buildable subdomain
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Exit code policy for a single build whose child ends without a code
    #[serde(default)]
    pub unknown_status: UnknownStatusPolicy,
}

fn default_shared_dir() -> PathBuf {
    PathBuf::from("shared")
}

fn default_subdomains_dir() -> PathBuf {
    PathBuf::from("subdomains")
}

fn default_subdomain_name() -> String {
    "default".to_string()
}

fn default_shared_folders() -> Vec<String> {
    ["components", "layouts", "styles", "assets"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_shared_files() -> Vec<String> {
    vec!["consts.ts".to_string()]
}

fn default_astro_version() -> String {
    "latest".to_string()
}

fn default_template() -> String {
    "basics".to_string()
}

fn default_typescript() -> String {
    "strict".to_string()
}

fn default_true() -> bool {
    true
}

fn default_package_manager() -> String {
    "pnpm".to_string()
}

fn default_build_args() -> Vec<String> {
    vec!["run".to_string(), "build".to_string()]
}

fn default_manifest() -> String {
    "package.json".to_string()
}

impl Default for FederationConfig {
    fn default() -> Self {
        Self {
            shared_dir: default_shared_dir(),
            subdomains_dir: default_subdomains_dir(),
            default_subdomain_name: default_subdomain_name(),
            shared_folders: default_shared_folders(),
            shared_files: default_shared_files(),
            scaffold: ScaffoldConfig::default(),
            build: BuildConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            astro_version: default_astro_version(),
            template: default_template(),
            typescript: default_typescript(),
            install: default_true(),
            git: false,
            command: default_package_manager(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: default_package_manager(),
            args: default_build_args(),
            manifest: default_manifest(),
            unknown_status: UnknownStatusPolicy::default(),
        }
    }
}

impl ScaffoldConfig {
    /// `astro@latest` or `astro@<version>`
    pub fn astro_package(&self) -> String {
        format!("astro@{}", self.astro_version)
    }

    /// Generator invocation that creates a project at `subdomain_dir`.
    pub fn generator_command(&self, subdomain_dir: &Path) -> CommandSpec {
        let mut args = vec![
            "create".to_string(),
            self.astro_package(),
            subdomain_dir.display().to_string(),
            "--".to_string(),
            "--template".to_string(),
            self.template.clone(),
            "--typescript".to_string(),
            self.typescript.clone(),
            "--yes".to_string(),
        ];
        if self.install {
            args.push("--install".to_string());
        }
        if !self.git {
            args.push("--no-git".to_string());
        }
        CommandSpec::new(self.command.clone(), args)
    }
}

impl BuildConfig {
    pub fn command_spec(&self) -> CommandSpec {
        CommandSpec::new(self.command.clone(), self.args.clone())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    SharedName(String, String),
    Build(String),
    Scaffold(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::SharedName(name, msg) => write!(f, "Shared entry '{}': {}", name, msg),
            ValidationError::Build(msg) => write!(f, "Build: {}", msg),
            ValidationError::Scaffold(msg) => write!(f, "Scaffold: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// True when `name` is exactly one ordinary path component.
pub fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

impl FederationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for name in self.shared_folders.iter().chain(self.shared_files.iter()) {
            if !is_plain_name(name) {
                errors.push(ValidationError::SharedName(
                    name.clone(),
                    "must be a single path component".to_string(),
                ));
            }
        }

        if self.build.command.trim().is_empty() {
            errors.push(ValidationError::Build("command cannot be empty".to_string()));
        }
        if !is_plain_name(&self.build.manifest) {
            errors.push(ValidationError::Build(format!(
                "manifest '{}' must be a file name",
                self.build.manifest
            )));
        }
        if self.scaffold.command.trim().is_empty() {
            errors.push(ValidationError::Scaffold(
                "command cannot be empty".to_string(),
            ));
        }
        if !is_plain_name(&self.default_subdomain_name) {
            errors.push(ValidationError::Scaffold(format!(
                "default subdomain name '{}' must be a single path component",
                self.default_subdomain_name
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
