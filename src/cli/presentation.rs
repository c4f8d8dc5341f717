//! CLI presentation: text and json formatters per command.

use crate::build::{BatchOutcome, BuildResult, SingleBuildOutcome};
use crate::error::FederationError;
use crate::scaffold::ScaffoldReport;
use crate::shared::{Ensured, LinkAction, LinkEntry, LinkReport};
use crate::workspace::{FolderState, TopologyStatus};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;

pub fn to_json<T: Serialize>(value: &T) -> Result<String, FederationError> {
    serde_json::to_string_pretty(value).map_err(|e| FederationError::Config(e.to_string()))
}

/// Header printed before a subdomain's build output starts streaming.
pub fn format_build_header(name: &str) -> String {
    format!("\n--- Building subdomain: {} ---\n", name)
}

pub fn format_link_report(report: &LinkReport) -> String {
    let mut lines = Vec::new();
    for entry in &report.entries {
        match (entry.action, &entry.target) {
            (LinkAction::Linked, Some(target)) | (LinkAction::AlreadyLinked, Some(target)) => {
                lines.push(format!("Linked src/{} -> {}", entry.folder, target.display()));
            }
            (LinkAction::SkippedConflict, _) => {
                lines.push(format!(
                    "Skipping {}: not a symlink (remove manually to replace).",
                    entry.folder
                ));
            }
            (LinkAction::Failed, _) => lines.push(format_link_failure(entry)),
            _ => {}
        }
    }
    let failed = report.failures().count();
    if failed > 0 {
        lines.push(format!("{} folder(s) could not be linked.", failed));
    } else {
        lines.push("Symlinks created.".to_string());
    }
    lines.join("\n")
}

pub fn format_scaffold_report(report: &ScaffoldReport, root: &Path) -> String {
    let mut lines = Vec::new();
    for extraction in &report.folders {
        lines.push(format_extraction(&extraction.name, extraction.outcome));
    }
    for extraction in &report.files {
        lines.push(format_extraction(&extraction.name, extraction.outcome));
    }
    if let Some(link) = &report.link {
        for entry in &link.entries {
            match entry.action {
                LinkAction::Linked | LinkAction::AlreadyLinked => lines.push(format!(
                    "Linked subdomain src/{} -> shared/{}",
                    entry.folder, entry.folder
                )),
                LinkAction::SkippedConflict => lines.push(format!(
                    "Skipping {}: not a symlink (remove manually to replace).",
                    entry.folder
                )),
                // Failures are already listed among the report's problems.
                LinkAction::Failed | LinkAction::MissingTarget => {}
            }
        }
    }
    for problem in &report.problems {
        lines.push(format!("Warning: {}", problem));
    }

    let subdomain = report.relative_subdomain_dir(root);
    let shared = report
        .shared_dir
        .strip_prefix(root)
        .unwrap_or(&report.shared_dir);
    lines.push(String::new());
    lines.push("Scaffold done.".to_string());
    lines.push(format!(
        "  {}/ - shared components, layouts, styles, assets",
        shared.display()
    ));
    lines.push(format!(
        "  {}/ - subdomain linked to the shared pool",
        subdomain.display()
    ));
    lines.push(format!("  Build: sitefed build-one {}", subdomain.display()));
    lines.join("\n")
}

fn format_link_failure(entry: &LinkEntry) -> String {
    format!(
        "Failed to link src/{}: {}",
        entry.folder,
        entry.error.as_deref().unwrap_or("unknown error")
    )
}

fn format_extraction(name: &str, outcome: Ensured) -> String {
    match outcome {
        Ensured::Created => format!("Copied src/{} -> shared/{}", name, name),
        _ => format!("Kept existing shared/{}", name),
    }
}

pub fn format_batch_outcome_text(outcome: &BatchOutcome) -> String {
    match outcome {
        BatchOutcome::NothingToBuild { directories: 0, .. } => {
            "No subdomain directories found.".to_string()
        }
        BatchOutcome::NothingToBuild { .. } => "No buildable subdomains found.".to_string(),
        BatchOutcome::Completed(report) => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Subdomain", "Result", "Status", "Time"]);
            for result in &report.results {
                table.add_row(vec![
                    result.name.clone(),
                    format_result_cell(result),
                    result.status.to_string(),
                    format!("{:.1}s", result.duration_ms as f64 / 1000.0),
                ]);
            }
            let failed = report.failed_count();
            let summary = if failed > 0 {
                format!("{} subdomain(s) failed to build.", failed)
            } else {
                "All subdomains built successfully.".to_string()
            };
            format!("\n{}\n\n{}", table, summary)
        }
    }
}

fn format_result_cell(result: &BuildResult) -> String {
    if result.success {
        format!("{}", "ok".green())
    } else if let Some(error) = &result.error {
        format!("{} ({})", "failed".red(), error)
    } else {
        format!("{}", "failed".red())
    }
}

pub fn format_single_build(outcome: &SingleBuildOutcome) -> String {
    if outcome.exit_code == 0 {
        format!("Subdomain {} built.", outcome.name)
    } else {
        format!(
            "Subdomain {} failed to build ({}).",
            outcome.name, outcome.status
        )
    }
}

pub fn format_status_text(status: &TopologyStatus) -> String {
    if status.subdomains.is_empty() {
        return format!(
            "No subdomain directories in {}",
            status.subdomains_dir.display()
        );
    }

    let mut header = vec!["Subdomain".to_string(), "Buildable".to_string()];
    header.extend(status.shared_folders.iter().cloned());

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(header);
    for subdomain in &status.subdomains {
        let mut row = vec![
            subdomain.name.clone(),
            if subdomain.buildable { "yes" } else { "no" }.to_string(),
        ];
        for (_, state) in &subdomain.folders {
            row.push(format_folder_state(state));
        }
        table.add_row(row);
    }

    format!(
        "{}\n  Shared: {}\n\n{}",
        "Link topology".bold().underline(),
        status.shared_dir.display(),
        table
    )
}

fn format_folder_state(state: &FolderState) -> String {
    match state {
        FolderState::Linked => format!("{}", state.label().green()),
        FolderState::StaleLink { .. } | FolderState::Private => {
            format!("{}", state.label().yellow())
        }
        FolderState::Absent => format!("{}", state.label().red()),
        FolderState::SharedMissing => format!("{}", state.label().dimmed()),
    }
}
