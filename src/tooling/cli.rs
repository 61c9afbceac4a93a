//! CLI Tooling
//!
//! Command-line interface for pack editing and export. Every command loads the
//! pack it names from the store, applies one operation and writes it back.

use crate::config::{ConfigLoader, PackmakerConfig};
use crate::error::{ApiError, StorageError, TreeError};
use crate::exporter;
use crate::host::FsAssetHost;
use crate::import::add_locations;
use crate::logging::{resolve_log_file_path, LoggingConfig};
use crate::pack::Pack;
use crate::store::{PackStore, TomlPackStore};
use crate::tooling::format::{
    format_build_report_text, format_pack_list_text, format_revert_report_text, format_tree_text,
};
use crate::tree::PackTree;
use crate::types::{split_path, NodeIndex};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

/// Packmaker CLI - Virtual asset packs exported into real folders
#[derive(Parser, Debug)]
#[command(name = "packmaker")]
#[command(about = "Group project assets into virtual packs and export them as folder trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply `--log-*` flags on top of the configured logging section.
    pub fn apply_logging_overrides(&self, logging: &mut LoggingConfig) -> Result<(), ApiError> {
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if logging.output.contains("file") {
            logging.file = Some(resolve_log_file_path(
                self.log_file.clone(),
                logging.file.clone(),
                Some(&self.workspace),
            )?);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create an empty pack
    New { pack: String },
    /// List packs
    List {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Show the folder tree of a pack
    Show {
        pack: String,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Show node ids in text output
        #[arg(long)]
        ids: bool,
    },
    /// Add project files or folders to a pack
    Add {
        pack: String,
        /// Project locations, relative to the workspace
        #[arg(required = true)]
        locations: Vec<String>,
        /// Pack folder to add into (created if missing)
        #[arg(long)]
        into: Option<String>,
    },
    /// Create a folder in a pack
    Mkdir {
        pack: String,
        /// Parent folder (default: pack root)
        #[arg(long)]
        parent: Option<String>,
        /// Folder name (default: "New Folder", numbered if taken)
        #[arg(long)]
        name: Option<String>,
    },
    /// Rename a pack folder
    Rename {
        pack: String,
        folder: String,
        name: String,
    },
    /// Move a file or folder to another pack folder
    Mv {
        pack: String,
        path: String,
        /// Target folder (default: pack root)
        #[arg(long)]
        into: Option<String>,
    },
    /// Remove a file or folder from a pack
    Rm { pack: String, path: String },
    /// Move the pack's assets into the export folder
    Build {
        pack: String,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Move exported assets back and remove the export folder
    Revert {
        pack: String,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Delete a pack (assets are untouched)
    Delete { pack: String },
}

/// Command name for logging.
fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::New { .. } => "new",
        Commands::List { .. } => "list",
        Commands::Show { .. } => "show",
        Commands::Add { .. } => "add",
        Commands::Mkdir { .. } => "mkdir",
        Commands::Rename { .. } => "rename",
        Commands::Mv { .. } => "mv",
        Commands::Rm { .. } => "rm",
        Commands::Build { .. } => "build",
        Commands::Revert { .. } => "revert",
        Commands::Delete { .. } => "delete",
    }
}

/// CLI context for managing workspace state
pub struct CliContext {
    workspace_root: PathBuf,
    config: PackmakerConfig,
    store: TomlPackStore,
    host: FsAssetHost,
}

impl CliContext {
    /// Load the configuration a context would use.
    pub fn load_config(
        workspace_root: &Path,
        config_path: Option<&Path>,
    ) -> Result<PackmakerConfig, ApiError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(workspace_root)?,
        };
        Ok(config)
    }

    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = Self::load_config(&workspace_root, config_path.as_deref())?;
        Self::with_config(workspace_root, config)
    }

    /// Create a context from an already loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: PackmakerConfig) -> Result<Self, ApiError> {
        let storage = config.system.storage.resolve_paths(&workspace_root)?;
        let store = TomlPackStore::new(storage.packs_dir);
        let host = FsAssetHost::open(&workspace_root, Some(storage.index_file))?;
        Ok(Self {
            workspace_root,
            config,
            store,
            host,
        })
    }

    pub fn config(&self) -> &PackmakerConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn store(&self) -> &TomlPackStore {
        &self.store
    }

    pub fn host(&self) -> &FsAssetHost {
        &self.host
    }

    /// Execute a CLI command
    pub fn execute(&mut self, command: &Commands) -> Result<String, ApiError> {
        let name = command_name(command);
        tracing::debug!(command = name, "Executing command");
        let result = self.execute_inner(command);
        if let Err(e) = &result {
            tracing::error!(command = name, error = %e, "Command failed");
        }
        result
    }

    fn execute_inner(&mut self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::New { pack } => {
                if self.store.exists(pack)? {
                    return Err(ApiError::PackExists(pack.clone()));
                }
                let mut new_pack = Pack::new(pack.clone())?;
                self.store.save(&mut new_pack)?;
                info!(pack = %pack, "Created pack");
                Ok(format!("Created pack {}", pack))
            }
            Commands::List { format } => self.handle_list(*format),
            Commands::Show { pack, format, ids } => self.handle_show(pack, *format, *ids),
            Commands::Add {
                pack,
                locations,
                into,
            } => self.edit_pack(pack, |pack, host| {
                let start = match into {
                    Some(folder) => ensure_folder_path(&mut pack.tree, folder)?,
                    None => pack.tree.root(),
                };
                let added = add_locations(pack, host, locations, start)?;
                Ok(format!(
                    "Added {} files to {} ({} total)",
                    added,
                    pack.name,
                    pack.leaf_count()
                ))
            }),
            Commands::Mkdir { pack, parent, name } => self.edit_pack(pack, |pack, _| {
                let parent = match parent {
                    Some(folder) => resolve_folder(&pack.tree, folder)?,
                    None => pack.tree.root(),
                };
                let created = pack.tree.create_folder(parent, name.as_deref())?;
                Ok(format!("Created folder {}", pack.tree.path_of(created)))
            }),
            Commands::Rename { pack, folder, name } => self.edit_pack(pack, |pack, _| {
                let index = resolve_path(&pack.tree, folder)?;
                pack.tree.rename(index, name)?;
                Ok(format!("Renamed {} to {}", folder, pack.tree.path_of(index)))
            }),
            Commands::Mv { pack, path, into } => self.edit_pack(pack, |pack, _| {
                let index = resolve_path(&pack.tree, path)?;
                let target = match into {
                    Some(folder) => resolve_folder(&pack.tree, folder)?,
                    None => pack.tree.root(),
                };
                pack.tree.move_node(index, target)?;
                Ok(format!("Moved {} to {}", path, pack.tree.path_of(index)))
            }),
            Commands::Rm { pack, path } => self.edit_pack(pack, |pack, _| {
                let index = resolve_path(&pack.tree, path)?;
                let before = pack.leaf_count();
                pack.tree.delete_entry(index)?;
                Ok(format!(
                    "Removed {} ({} files)",
                    path,
                    before - pack.leaf_count()
                ))
            }),
            Commands::Build { pack, format } => self.handle_build(pack, *format),
            Commands::Revert { pack, format } => self.handle_revert(pack, *format),
            Commands::Delete { pack } => {
                let loaded = self.store.load(pack)?;
                if loaded.is_built() {
                    return Err(ApiError::PackBuilt(pack.clone()));
                }
                self.store.delete(pack)?;
                info!(pack = %pack, "Deleted pack");
                Ok(format!("Deleted pack {}", pack))
            }
        }
    }

    /// Load a pack, refuse if it is built, apply `edit`, then persist pack and index.
    fn edit_pack<F>(&mut self, name: &str, edit: F) -> Result<String, ApiError>
    where
        F: FnOnce(&mut Pack, &mut FsAssetHost) -> Result<String, ApiError>,
    {
        let mut pack = self.store.load(name)?;
        if pack.is_built() {
            return Err(ApiError::PackBuilt(name.to_string()));
        }
        let message = edit(&mut pack, &mut self.host)?;
        self.store.save(&mut pack)?;
        self.host.flush()?;
        Ok(message)
    }

    fn handle_list(&self, format: OutputFormat) -> Result<String, ApiError> {
        let packs = self.store.list()?;
        match format {
            OutputFormat::Text => Ok(format_pack_list_text(&packs)),
            OutputFormat::Json => {
                let items: Vec<_> = packs
                    .iter()
                    .map(|p| {
                        json!({
                            "name": p.name,
                            "files": p.document.entries.len(),
                            "built_to": p.document.built_to,
                            "built_at": p.document.built_at,
                        })
                    })
                    .collect();
                to_json(&items)
            }
        }
    }

    fn handle_show(&self, name: &str, format: OutputFormat, ids: bool) -> Result<String, ApiError> {
        let pack = self.store.load(name)?;
        let view = pack.tree.view();
        match format {
            OutputFormat::Text => {
                let mut out = format_tree_text(&pack.name, &view, ids);
                if let Some(destination) = &pack.built_to {
                    out.push_str(&format!("\n\nBuilt to {}", destination));
                }
                Ok(out)
            }
            OutputFormat::Json => to_json(&json!({
                "name": pack.name,
                "built_to": pack.built_to,
                "built_at": pack.built_at,
                "tree": view,
            })),
        }
    }

    fn handle_build(&mut self, name: &str, format: OutputFormat) -> Result<String, ApiError> {
        let mut pack = self.store.load(name)?;
        if pack.is_built() {
            return Err(ApiError::PackBuilt(name.to_string()));
        }
        let destination = self.config.export.destination_for(&pack.name);
        let result = exporter::build(&mut pack, &mut self.host, &destination);
        // Moves may have happened even when the build stopped early.
        self.store.save(&mut pack)?;
        self.host.flush()?;
        let report = result?;
        match format {
            OutputFormat::Text => Ok(format_build_report_text(&pack.name, &report)),
            OutputFormat::Json => to_json(&report),
        }
    }

    fn handle_revert(&mut self, name: &str, format: OutputFormat) -> Result<String, ApiError> {
        let mut pack = self.store.load(name)?;
        if !pack.is_built() {
            return Err(ApiError::PackNotBuilt(name.to_string()));
        }
        let result = exporter::revert(&mut pack, &mut self.host);
        self.store.save(&mut pack)?;
        self.host.flush()?;
        let report = result?;
        match format {
            OutputFormat::Text => Ok(format_revert_report_text(&pack.name, &report)),
            OutputFormat::Json => to_json(&report),
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| StorageError::Serialization(e.to_string()).into())
}

/// Resolve a pack path; `/` or an empty path is the root.
fn resolve_path(tree: &PackTree, path: &str) -> Result<NodeIndex, ApiError> {
    tree.find_path(path)
        .ok_or_else(|| ApiError::PathNotInPack(path.to_string()))
}

fn resolve_folder(tree: &PackTree, path: &str) -> Result<NodeIndex, ApiError> {
    let index = resolve_path(tree, path)?;
    if tree.node(index)?.is_leaf() {
        return Err(TreeError::NotAFolder(path.to_string()).into());
    }
    Ok(index)
}

/// Resolve a folder path, creating missing folders along the way.
fn ensure_folder_path(tree: &mut PackTree, path: &str) -> Result<NodeIndex, ApiError> {
    let mut current = tree.root();
    for segment in split_path(path) {
        current = match tree.find_child_folder(current, segment) {
            Some(existing) => existing,
            None => tree.create_folder(current, Some(segment))?,
        };
    }
    Ok(current)
}
