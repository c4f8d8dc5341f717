//! link-shared command: preconditions, conflicts and idempotence

#![cfg(unix)]

use super::test_utils::*;
use sitefed::cli::Commands;
use sitefed::error::FederationError;
use std::fs;
use std::path::PathBuf;

fn link_command(subdomain: &str) -> Commands {
    Commands::LinkShared {
        subdomain: PathBuf::from(subdomain),
        shared: None,
    }
}

#[test]
fn test_missing_shared_dir_fails_without_changes() {
    let ws = TestWorkspace::new();
    let dir = ws.add_buildable("default");

    let err = ws
        .context(&FakeRunner::new())
        .execute(&link_command("subdomains/default"))
        .unwrap_err();

    assert!(matches!(
        err,
        FederationError::MissingDirectory { what: "Shared directory", .. }
    ));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(fs::read_dir(dir.join("src")).unwrap().count(), 0);
}

#[test]
fn test_missing_src_fails() {
    let ws = TestWorkspace::new();
    ws.seed_shared();
    ws.add_plain_dir("default");

    let err = ws
        .context(&FakeRunner::new())
        .execute(&link_command("subdomains/default"))
        .unwrap_err();

    assert!(matches!(
        err,
        FederationError::MissingDirectory { what: "Subdomain src", .. }
    ));
}

#[test]
fn test_links_every_folder_and_is_idempotent() {
    let ws = TestWorkspace::new();
    ws.seed_shared();
    let dir = ws.add_buildable("default");
    let context = ws.context(&FakeRunner::new());

    let first = context.execute(&link_command("subdomains/default")).unwrap();
    assert!(first.is_success());
    assert!(first.output.ends_with("Symlinks created."));

    let targets = |dir: &PathBuf| -> Vec<PathBuf> {
        ws.config
            .shared_folders
            .iter()
            .map(|f| fs::read_link(dir.join("src").join(f)).unwrap())
            .collect()
    };
    let before = targets(&dir);
    assert_eq!(before[0], PathBuf::from("../../../shared/components"));

    context.execute(&link_command("subdomains/default")).unwrap();
    assert_eq!(targets(&dir), before);
    assert_eq!(
        fs::read_to_string(dir.join("src/styles/shared.txt")).unwrap(),
        "styles"
    );
}

#[test]
fn test_private_folder_is_preserved() {
    let ws = TestWorkspace::new();
    ws.seed_shared();
    let dir = ws.add_buildable("default");
    write_file(&dir.join("src/layouts/Private.astro"), "mine");

    let outcome = ws
        .context(&FakeRunner::new())
        .execute(&link_command("subdomains/default"))
        .unwrap();

    assert!(outcome.output.contains("Skipping layouts"));
    let layouts = fs::symlink_metadata(dir.join("src/layouts")).unwrap();
    assert!(layouts.is_dir() && !layouts.file_type().is_symlink());
    assert_eq!(
        fs::read_to_string(dir.join("src/layouts/Private.astro")).unwrap(),
        "mine"
    );
    assert!(fs::symlink_metadata(dir.join("src/components"))
        .unwrap()
        .file_type()
        .is_symlink());
}

#[test]
fn test_stale_link_is_replaced() {
    let ws = TestWorkspace::new();
    ws.seed_shared();
    let dir = ws.add_buildable("default");
    std::os::unix::fs::symlink("../elsewhere", dir.join("src/components")).unwrap();

    ws.context(&FakeRunner::new())
        .execute(&link_command("subdomains/default"))
        .unwrap();

    assert_eq!(
        fs::read_link(dir.join("src/components")).unwrap(),
        PathBuf::from("../../../shared/components")
    );
}

#[test]
fn test_absent_shared_folder_is_skipped() {
    let ws = TestWorkspace::new();
    write_file(&ws.shared().join("components/Card.astro"), "card");
    let dir = ws.add_buildable("default");

    ws.context(&FakeRunner::new())
        .execute(&link_command("subdomains/default"))
        .unwrap();

    assert!(dir.join("src/components/Card.astro").exists());
    assert!(fs::symlink_metadata(dir.join("src/assets")).is_err());
}

#[test]
fn test_explicit_shared_dir_resolves_against_cwd() {
    let ws = TestWorkspace::new();
    write_file(&ws.root().join("pool/components/Card.astro"), "pooled");
    let dir = ws.add_buildable("default");

    let mut overrides = ws.overrides();
    overrides.cwd = ws.root().join("subdomains");
    ws.context_with(&FakeRunner::new(), overrides)
        .execute(&Commands::LinkShared {
            subdomain: PathBuf::from("subdomains/default"),
            shared: Some(PathBuf::from("../pool")),
        })
        .unwrap();

    assert_eq!(
        fs::read_link(dir.join("src/components")).unwrap(),
        PathBuf::from("../../../pool/components")
    );
    assert_eq!(
        fs::read_to_string(dir.join("src/components/Card.astro")).unwrap(),
        "pooled"
    );
}

#[test]
fn test_link_shared_runs_no_processes() {
    let ws = TestWorkspace::new();
    ws.seed_shared();
    ws.add_buildable("default");
    let runner = FakeRunner::new();

    ws.context(&runner)
        .execute(&link_command("subdomains/default"))
        .unwrap();
    assert!(runner.calls().is_empty());
}

#[test]
fn test_one_failing_folder_fails_the_command_but_links_the_rest() {
    let mut config = sitefed::config::ConfigLoader::defaults();
    config.shared_folders = vec!["blocked/inner".to_string(), "components".to_string()];
    let ws = TestWorkspace::with_config(config);
    write_file(&ws.shared().join("blocked/inner/x.txt"), "x");
    write_file(&ws.shared().join("components/Card.astro"), "card");
    let dir = ws.add_buildable("default");
    write_file(&dir.join("src/blocked"), "a file, not a directory");

    let outcome = ws
        .context(&FakeRunner::new())
        .execute(&link_command("subdomains/default"))
        .unwrap();

    assert_eq!(outcome.exit_code, 1);
    assert!(outcome.output.contains("Failed to link src/blocked/inner"));
    assert_eq!(
        fs::read_to_string(dir.join("src/components/Card.astro")).unwrap(),
        "card"
    );
}

#[test]
fn test_links_resolve_through_symlinked_subdomains_dir() {
    let ws = TestWorkspace::new();
    ws.seed_shared();
    let real = ws.root().join("deep/nested/sites");
    write_file(&real.join("blog/package.json"), "{}");
    fs::create_dir_all(real.join("blog/src")).unwrap();
    std::os::unix::fs::symlink("deep/nested/sites", ws.root().join("subdomains")).unwrap();

    let outcome = ws
        .context(&FakeRunner::new())
        .execute(&link_command("subdomains/blog"))
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(
        fs::read_to_string(real.join("blog/src/styles/shared.txt")).unwrap(),
        "styles"
    );
}
