//! Global config file: `$XDG_CONFIG_HOME/packmaker/config.toml`

use crate::config::xdg;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};

/// Add the global config file if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match xdg::global_config_path() {
        Ok(path) if path.is_file() => Ok(builder.add_source(File::from(path).required(false))),
        Ok(_) => Ok(builder),
        Err(e) => {
            tracing::debug!("Skipping global config: {}", e);
            Ok(builder)
        }
    }
}
