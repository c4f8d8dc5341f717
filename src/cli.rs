//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::{map_error, CommandOutcome};
pub use parse::{Cli, Commands};
pub use presentation::{
    format_batch_outcome_text, format_build_header, format_link_report, format_scaffold_report,
    format_single_build, format_status_text, to_json,
};
pub use route::{Overrides, RunContext};
