//! Configuration layering as seen by the run context

use super::test_utils::write_file;
use sitefed::cli::RunContext;
use sitefed::error::FederationError;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_context_uses_package_manifest_section() {
    let temp = TempDir::new().unwrap();
    write_file(
        &temp.path().join("package.json"),
        r#"{
            "name": "site",
            "astro_config_federation": {
                "subdomainsDir": "sites",
                "sharedDir": "pool",
                "sharedFolders": ["components", "icons"],
                "build": { "command": "npm" }
            }
        }"#,
    );

    let context = RunContext::new(temp.path().to_path_buf(), None).unwrap();

    let root = dunce::canonicalize(temp.path()).unwrap();
    assert_eq!(context.layout().subdomains_dir, root.join("sites"));
    assert_eq!(context.layout().shared_dir, root.join("pool"));
    assert_eq!(context.config().shared_folders, vec!["components", "icons"]);
    assert_eq!(context.config().build.command, "npm");
    assert_eq!(context.config().build.args, vec!["run", "build"]);
}

#[test]
fn test_workspace_file_wins_over_manifest() {
    let temp = TempDir::new().unwrap();
    write_file(
        &temp.path().join("package.json"),
        r#"{"astro_config_federation": {"subdomainsDir": "sites", "defaultSubdomainName": "www"}}"#,
    );
    write_file(
        &temp.path().join("sitefed.toml"),
        "subdomains_dir = \"apps\"\n",
    );

    let context = RunContext::new(temp.path().to_path_buf(), None).unwrap();

    assert!(context.layout().subdomains_dir.ends_with("apps"));
    assert_eq!(context.config().default_subdomain_name, "www");
}

#[test]
fn test_explicit_config_replaces_workspace_sources() {
    let temp = TempDir::new().unwrap();
    write_file(
        &temp.path().join("sitefed.toml"),
        "subdomains_dir = \"apps\"\n",
    );
    let explicit = temp.path().join("ci.toml");
    write_file(&explicit, "[build]\nmanifest = \"astro.config.mjs\"\n");

    let context = RunContext::new(temp.path().to_path_buf(), Some(explicit)).unwrap();

    assert!(context.layout().subdomains_dir.ends_with("subdomains"));
    assert_eq!(context.config().build.manifest, "astro.config.mjs");
}

#[test]
fn test_missing_explicit_config() {
    let temp = TempDir::new().unwrap();
    let err = RunContext::new(
        temp.path().to_path_buf(),
        Some(temp.path().join("absent.toml")),
    )
    .err()
    .unwrap();
    assert!(matches!(
        err,
        FederationError::MissingDirectory { what: "Configuration file", .. }
    ));
}

#[test]
fn test_missing_workspace_root() {
    let err = RunContext::new(PathBuf::from("/definitely/not/a/workspace"), None)
        .err()
        .unwrap();
    assert!(err.to_string().starts_with("Workspace root not found"));
}

#[test]
fn test_malformed_manifest_is_a_config_error() {
    let temp = TempDir::new().unwrap();
    write_file(&temp.path().join("package.json"), "{ not json");

    let err = RunContext::new(temp.path().to_path_buf(), None).err().unwrap();
    assert!(matches!(err, FederationError::Config(_)));
}

#[test]
fn test_invalid_values_are_rejected() {
    let temp = TempDir::new().unwrap();
    write_file(
        &temp.path().join("sitefed.toml"),
        "shared_folders = [\"../escape\"]\n",
    );

    let err = RunContext::new(temp.path().to_path_buf(), None).err().unwrap();
    assert!(err.to_string().contains("validation failed"));
}
