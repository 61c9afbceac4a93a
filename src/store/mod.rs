//! Pack Store
//!
//! Persistence of pack documents. Only the flattened entry list is stored;
//! trees are rebuilt on load.

pub mod toml_store;

use crate::error::ApiError;
use crate::pack::{Pack, PackDocument};
use std::path::PathBuf;

pub use toml_store::TomlPackStore;

/// A stored pack document and where it lives.
#[derive(Debug, Clone)]
pub struct StoredPack {
    pub name: String,
    pub document: PackDocument,
    pub path: PathBuf,
}

pub trait PackStore {
    fn list(&self) -> Result<Vec<StoredPack>, ApiError>;
    fn path_for(&self, name: &str) -> Result<PathBuf, ApiError>;
    fn load(&self, name: &str) -> Result<Pack, ApiError>;
    fn save(&self, pack: &mut Pack) -> Result<(), ApiError>;
    fn delete(&self, name: &str) -> Result<(), ApiError>;

    fn exists(&self, name: &str) -> Result<bool, ApiError> {
        Ok(self.path_for(name)?.is_file())
    }
}
