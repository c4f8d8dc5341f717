//! Sitefed CLI Binary
//!
//! Command-line interface for linking subdomains to the shared asset pool and
//! building them.

use clap::error::ErrorKind;
use clap::Parser;
use sitefed::cli::{Cli, RunContext};
use sitefed::config::ConfigLoader;
use sitefed::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(usage_exit_code(e.kind()));
        }
    };

    // Build logging config from CLI args and config file
    let logging_config = build_logging_config(&cli);

    // Initialize logging early
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Sitefed CLI starting");

    let context = match RunContext::new(cli.workspace.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing workspace: {}", e);
            eprintln!("{}", sitefed::cli::map_error(&e));
            process::exit(e.exit_code());
        }
    };

    match context.execute(&cli.command) {
        Ok(outcome) if outcome.is_success() => {
            info!("Command completed successfully");
            println!("{}", outcome.output);
        }
        Ok(outcome) => {
            info!(exit_code = outcome.exit_code, "Command completed with failures");
            eprintln!("{}", outcome.output);
            process::exit(outcome.exit_code);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", sitefed::cli::map_error(&e));
            process::exit(e.exit_code());
        }
    }
}

/// Exit code for a command line that did not parse: 0 when help or the version
/// was requested, 1 for any usage error.
fn usage_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = RunContext::load_config(&cli.workspace, cli.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_else(|_| ConfigLoader::defaults().logging);

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
