//! CLI parse: clap types for sitefed. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sitefed CLI - shared assets and builds for multi-subdomain site workspaces
#[derive(Parser, Debug)]
#[command(name = "sitefed")]
#[command(about = "Link subdomains to a shared asset pool and build them together")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides package.json and sitefed.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build every subdomain that has a build manifest
    BuildAll {
        /// Output format for the summary (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Build one subdomain and exit with its build status
    BuildOne {
        /// Subdomain directory, relative to the workspace root
        path: PathBuf,
    },
    /// Create a new subdomain and link it to the shared pool
    Scaffold {
        /// Subdomain name (default: $SUBDOMAIN_NAME, then the configured default)
        #[arg(long)]
        name: Option<String>,
    },
    /// Re-create shared folder links for an existing subdomain
    LinkShared {
        /// Subdomain directory, relative to the workspace root
        subdomain: PathBuf,
        /// Shared pool, relative to the current directory (default: configured shared dir)
        shared: Option<PathBuf>,
    },
    /// Show link topology for every subdomain
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
