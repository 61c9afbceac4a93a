//! Layer composition for `PackmakerConfig`.
//!
//! Every load starts from the built-in defaults and finishes with the
//! `PACKMAKER__SECTION__KEY` environment overlay. Only the file layers in
//! between depend on how the load was asked for.

use crate::config::sources::{global_file, workspace_file};
use crate::config::PackmakerConfig;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use std::path::Path;

use super::merge_policy;

const ENV_PREFIX: &str = "PACKMAKER";
const ENV_SEPARATOR: &str = "__";

pub struct MergeService;

impl MergeService {
    /// Defaults, then the global file, then `<workspace>/packmaker.toml`.
    /// Missing files are skipped.
    pub fn load(workspace_root: &Path) -> Result<PackmakerConfig, ConfigError> {
        let files = global_file::add_to_builder(merge_policy::builder_with_defaults()?)?;
        let files = workspace_file::add_to_builder(files, workspace_root)?;
        finish(files, environment_layer())
    }

    /// Defaults, then exactly one file, which must exist.
    pub fn load_from_file(path: &Path) -> Result<PackmakerConfig, ConfigError> {
        let files = merge_policy::builder_with_defaults()?.add_source(File::from(path));
        finish(files, environment_layer())
    }
}

/// `PACKMAKER__EXPORT__ROOT` sets `export.root`; values are parsed where possible.
fn environment_layer() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

fn finish(
    files: ConfigBuilder<DefaultState>,
    environment: Environment,
) -> Result<PackmakerConfig, ConfigError> {
    files.add_source(environment).build()?.try_deserialize()
}
