//! Configuration
//!
//! Layered configuration loaded with the `config` crate. Precedence, lowest to
//! highest: built-in defaults, global file, workspace file, environment.

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod workspace;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use workspace::StorageConfig;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Folder, relative to the project root, that receives built packs.
pub const DEFAULT_EXPORT_ROOT: &str = "Assets/_PACK_EXPORT";

/// Name of the per-workspace configuration file.
pub const WORKSPACE_CONFIG_FILE: &str = "packmaker.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackmakerConfig {
    #[serde(default)]
    pub system: SystemConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// System settings (storage locations).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_export_root() -> String {
    DEFAULT_EXPORT_ROOT.to_string()
}

/// Where builds are materialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Export folder as a project location; each pack builds into `<root>/<pack name>`.
    #[serde(default = "default_export_root")]
    pub root: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            root: default_export_root(),
        }
    }
}

impl ExportConfig {
    /// Destination root for a pack.
    pub fn destination_for(&self, pack_name: &str) -> String {
        crate::host::join_location(&self.root, pack_name)
    }
}
