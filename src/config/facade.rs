//! Config loader: builds a [`FederationConfig`] from the layered sources.

use super::merge::merge_policy;
use super::sources::{package_manifest, workspace_file};
use super::FederationConfig;
use crate::error::FederationError;
use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the configuration for the workspace at `workspace_root`.
    ///
    /// Precedence (lowest to highest): defaults, `package.json` section, `sitefed.toml`.
    pub fn load(workspace_root: &Path) -> Result<FederationConfig, FederationError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = package_manifest::add_to_builder(builder, workspace_root)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        Self::finish(builder)
    }

    /// Load from one explicit file instead of the workspace sources.
    ///
    /// A `.json` file is read as a package manifest; anything else goes to the
    /// `config` crate, which picks the format from the extension.
    pub fn load_from_file(path: &Path) -> Result<FederationConfig, FederationError> {
        if !path.is_file() {
            return Err(FederationError::MissingDirectory {
                what: "Configuration file",
                path: path.to_path_buf(),
            });
        }
        let builder = merge_policy::builder_with_defaults()?;
        let builder = if path.extension().is_some_and(|ext| ext == "json") {
            package_manifest::add_file_to_builder(builder, path)?
        } else {
            builder.add_source(File::from(path).required(true))
        };
        Self::finish(builder)
    }

    /// Configuration with no sources at all.
    pub fn defaults() -> FederationConfig {
        FederationConfig::default()
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<FederationConfig, FederationError> {
        let config: FederationConfig = builder.build()?.try_deserialize()?;
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            FederationError::Config(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;
        Ok(config)
    }
}
