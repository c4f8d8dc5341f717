//! Package manifest source: the `astro_config_federation` section of `package.json`.
//!
//! The section uses camelCase keys (`sharedDir`, `scaffold.astroVersion`). They are
//! rewritten to snake_case and handed to the builder as an in-memory JSON source
//! so the regular precedence order still applies.

use crate::error::FederationError;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::{File, FileFormat};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const PACKAGE_MANIFEST: &str = "package.json";
pub const SECTION: &str = "astro_config_federation";

pub fn package_manifest_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(PACKAGE_MANIFEST)
}

/// Add the workspace manifest section to the builder if the manifest has one.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, FederationError> {
    let path = package_manifest_path(workspace_root);
    if !path.exists() {
        debug!(manifest = %path.display(), "No package manifest, using defaults");
        return Ok(builder);
    }
    add_file_to_builder(builder, &path)
}

/// Add the section of a specific manifest file. The file must exist.
pub fn add_file_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, FederationError> {
    let raw = std::fs::read_to_string(path).map_err(|e| FederationError::io(path, e))?;
    match read_section(&raw)? {
        Some(section) => Ok(builder.add_source(File::from_str(&section, FileFormat::Json))),
        None => {
            debug!(manifest = %path.display(), "Manifest has no {} section", SECTION);
            Ok(builder)
        }
    }
}

/// Extract the federation section as snake_case JSON text.
pub fn read_section(manifest: &str) -> Result<Option<String>, FederationError> {
    let value: Value = serde_json::from_str(manifest)
        .map_err(|e| FederationError::Config(format!("Invalid {}: {}", PACKAGE_MANIFEST, e)))?;
    let section = match value.get(SECTION) {
        Some(section @ Value::Object(_)) => section.clone(),
        Some(Value::Null) | None => return Ok(None),
        Some(_) => {
            return Err(FederationError::Config(format!(
                "{} must be an object",
                SECTION
            )))
        }
    };
    serde_json::to_string(&snake_case_keys(section))
        .map(Some)
        .map_err(|e| FederationError::Config(e.to_string()))
}

fn snake_case_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, inner)| (to_snake_case(&key), snake_case_keys(inner)))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
