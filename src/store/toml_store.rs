use crate::error::{ApiError, StorageError};
use crate::pack::{validate_pack_name, Pack, PackDocument};
use crate::store::{PackStore, StoredPack};
use std::path::{Path, PathBuf};

/// One `<name>.toml` document per pack under a packs directory.
pub struct TomlPackStore {
    packs_dir: PathBuf,
}

impl TomlPackStore {
    pub fn new(packs_dir: impl Into<PathBuf>) -> Self {
        Self {
            packs_dir: packs_dir.into(),
        }
    }

    pub fn packs_dir(&self) -> &Path {
        &self.packs_dir
    }

    fn read_document(path: &Path) -> Result<PackDocument, ApiError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StorageError::InvalidPath(format!("Failed to read pack {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            ApiError::StorageError(StorageError::Serialization(format!(
                "Failed to parse pack {}: {}",
                path.display(),
                e
            )))
        })
    }
}

impl PackStore for TomlPackStore {
    fn list(&self) -> Result<Vec<StoredPack>, ApiError> {
        if !self.packs_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.packs_dir).map_err(|e| {
            StorageError::InvalidPath(format!(
                "Failed to read packs directory {}: {}",
                self.packs_dir.display(),
                e
            ))
        })?;

        let mut loaded = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(
                        "Failed to read directory entry in {}: {}",
                        self.packs_dir.display(),
                        e
                    );
                    continue;
                }
            };

            let path = entry.path();
            if path.extension() != Some(std::ffi::OsStr::new("toml")) {
                continue;
            }

            let name = match path.file_stem().and_then(|s| s.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    tracing::warn!("Invalid pack filename non UTF8: {:?}", path);
                    continue;
                }
            };

            let document = match Self::read_document(&path) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::error!("{}", e);
                    continue;
                }
            };

            if document.name != name {
                tracing::warn!(
                    "Pack name mismatch in {}: filename={}, document={}",
                    path.display(),
                    name,
                    document.name
                );
            }

            loaded.push(StoredPack {
                name,
                document,
                path,
            });
        }

        loaded.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(loaded)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, ApiError> {
        validate_pack_name(name)?;
        Ok(self.packs_dir.join(format!("{}.toml", name)))
    }

    fn load(&self, name: &str) -> Result<Pack, ApiError> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(ApiError::PackNotFound(name.to_string()));
        }
        let mut document = Self::read_document(&path)?;
        // The file name is authoritative.
        document.name = name.to_string();
        let pack = Pack::from_document(document)?;
        tracing::debug!(pack = name, leaves = pack.leaf_count(), "Loaded pack");
        Ok(pack)
    }

    fn save(&self, pack: &mut Pack) -> Result<(), ApiError> {
        let path = self.path_for(&pack.name)?;
        std::fs::create_dir_all(&self.packs_dir).map_err(|e| {
            StorageError::InvalidPath(format!(
                "Failed to create packs directory {}: {}",
                self.packs_dir.display(),
                e
            ))
        })?;

        let document = pack.to_document();
        let content = toml::to_string_pretty(&document).map_err(|e| {
            StorageError::Serialization(format!("Failed to serialize pack {}: {}", pack.name, e))
        })?;
        std::fs::write(&path, content).map_err(|e| {
            StorageError::InvalidPath(format!(
                "Failed to write pack to {}: {}",
                path.display(),
                e
            ))
        })?;
        tracing::debug!(pack = %pack.name, entries = document.entries.len(), "Saved pack");
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<(), ApiError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(ApiError::PackNotFound(name.to_string()));
        }
        std::fs::remove_file(&path).map_err(|e| {
            ApiError::StorageError(StorageError::InvalidPath(format!(
                "Failed to delete pack file {}: {}",
                path.display(),
                e
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssetRef;
    use tempfile::TempDir;

    #[test]
    fn test_save_load_list_delete() {
        let temp = TempDir::new().unwrap();
        let store = TomlPackStore::new(temp.path().join("packs"));
        assert!(store.list().unwrap().is_empty());

        let mut pack = Pack::new("characters").unwrap();
        let root = pack.tree.root();
        pack.tree
            .insert_path("hero/hero.png", AssetRef::new("H"), root, None)
            .unwrap();
        store.save(&mut pack).unwrap();

        assert!(store.exists("characters").unwrap());
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].document.entries.len(), 1);

        let loaded = store.load("characters").unwrap();
        assert_eq!(loaded.tree.view(), pack.tree.view());

        store.delete("characters").unwrap();
        assert!(!store.exists("characters").unwrap());
        assert!(matches!(
            store.load("characters"),
            Err(ApiError::PackNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let temp = TempDir::new().unwrap();
        let store = TomlPackStore::new(temp.path());
        assert!(matches!(
            store.path_for("../evil"),
            Err(ApiError::InvalidPackName(_))
        ));
    }

    #[test]
    fn test_list_skips_broken_documents() {
        let temp = TempDir::new().unwrap();
        let store = TomlPackStore::new(temp.path());
        std::fs::write(temp.path().join("broken.toml"), "entries = 3").unwrap();
        std::fs::write(temp.path().join("notes.txt"), "ignored").unwrap();
        let mut pack = Pack::new("ok").unwrap();
        store.save(&mut pack).unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["ok"]);
    }
}
