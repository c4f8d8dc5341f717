//! build-one: preconditions and exit code passthrough

use super::test_utils::*;
use sitefed::cli::Commands;
use sitefed::config::ConfigLoader;
use sitefed::error::FederationError;
use sitefed::process::{ExitStatus, UnknownStatusPolicy};
use std::path::PathBuf;

fn build_one(path: &str) -> Commands {
    Commands::BuildOne {
        path: PathBuf::from(path),
    }
}

#[test]
fn test_missing_directory_spawns_nothing() {
    let ws = TestWorkspace::new();
    let runner = FakeRunner::new();

    let err = ws
        .context(&runner)
        .execute(&build_one("subdomains/ghost"))
        .unwrap_err();

    assert!(matches!(
        err,
        FederationError::MissingDirectory { what: "Subdomain directory", .. }
    ));
    assert_eq!(err.exit_code(), 1);
    assert!(runner.calls().is_empty());
}

#[test]
fn test_missing_manifest_spawns_nothing() {
    let ws = TestWorkspace::new();
    ws.add_plain_dir("notes");
    let runner = FakeRunner::new();

    let err = ws
        .context(&runner)
        .execute(&build_one("subdomains/notes"))
        .unwrap_err();

    assert!(matches!(err, FederationError::MissingManifest { .. }));
    assert!(err.to_string().starts_with("No build manifest"));
    assert!(runner.calls().is_empty());
}

#[test]
fn test_exit_code_is_passed_through() {
    let ws = TestWorkspace::new();
    ws.add_buildable("blog");
    let runner = FakeRunner::new().with_status("blog", ExitStatus::Code(5));

    let outcome = ws
        .context(&runner)
        .execute(&build_one("subdomains/blog"))
        .unwrap();

    assert_eq!(outcome.exit_code, 5);
    assert!(!outcome.is_success());
    let calls = runner.calls_in(Mode::Streaming);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].cwd, ws.subdomain("blog"));
}

#[test]
fn test_successful_build() {
    let ws = TestWorkspace::new();
    ws.add_buildable("blog");

    let outcome = ws
        .context(&FakeRunner::new())
        .execute(&build_one("subdomains/blog"))
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.output, "Subdomain blog built.");
}

#[test]
fn test_unknown_status_follows_policy() {
    let ws = TestWorkspace::new();
    ws.add_buildable("blog");
    let runner = FakeRunner::new().with_status("blog", ExitStatus::Unknown);
    let outcome = ws
        .context(&runner)
        .execute(&build_one("subdomains/blog"))
        .unwrap();
    assert_eq!(outcome.exit_code, 0, "default policy treats a missing code as success");

    let mut config = ConfigLoader::defaults();
    config.build.unknown_status = UnknownStatusPolicy::Failure;
    let strict = TestWorkspace::with_config(config);
    strict.add_buildable("blog");
    let runner = FakeRunner::new().with_status("blog", ExitStatus::Unknown);
    let outcome = strict
        .context(&runner)
        .execute(&build_one("subdomains/blog"))
        .unwrap();
    assert_eq!(outcome.exit_code, 1);
}

#[test]
fn test_custom_build_command() {
    let mut config = ConfigLoader::defaults();
    config.build.command = "npm".to_string();
    config.build.args = vec!["run".to_string(), "build:prod".to_string()];
    let ws = TestWorkspace::with_config(config);
    ws.add_buildable("blog");
    let runner = FakeRunner::new();

    ws.context(&runner)
        .execute(&build_one("subdomains/blog"))
        .unwrap();

    let calls = runner.calls();
    assert_eq!(calls[0].command.to_string(), "npm run build:prod");
}
