//! Workspace config file source: `sitefed.toml` at the workspace root.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};

pub const WORKSPACE_CONFIG_FILE: &str = "sitefed.toml";

pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_CONFIG_FILE)
}

/// Add `sitefed.toml` to the builder when present. Keys are snake_case.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = workspace_config_path(workspace_root);
    if !path.exists() {
        return Ok(builder);
    }
    Ok(builder.add_source(File::from(path).required(false)))
}
