//! Merge rules: defaults first, then the package manifest section, then `sitefed.toml`.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("shared_dir", "shared")?
        .set_default("subdomains_dir", "subdomains")?
        .set_default("default_subdomain_name", "default")
}
