//! Built-in defaults every configuration starts from.

use crate::config::DEFAULT_EXPORT_ROOT;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("export.root", DEFAULT_EXPORT_ROOT)?
        .set_default("logging.level", "info")
}
