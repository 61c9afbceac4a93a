//! Error types shared across the pack model, storage and command layers.

use thiserror::Error;

/// Errors raised while editing a pack tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Path has no segments: {0:?}")]
    EmptyPath(String),

    #[error("Node is not a folder: {0}")]
    NotAFolder(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("A folder named {name} already exists under {parent}")]
    NameConflict { name: String, parent: String },

    #[error("Invalid folder name: {0:?}")]
    InvalidName(String),

    #[error("Cannot move {node} into itself or one of its descendants")]
    CyclicMove { node: String },

    #[error("The pack root cannot be {0}")]
    RootOperation(&'static str),
}

/// Errors raised by persistence and host I/O.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Top-level error returned by pack commands.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Tree error: {0}")]
    TreeError(#[from] TreeError),

    #[error("Destination {0} already exists, revert the pack before exporting again")]
    Conflict(String),

    #[error("Pack not found: {0}")]
    PackNotFound(String),

    #[error("Pack already exists: {0}")]
    PackExists(String),

    #[error("Invalid pack name: {0:?}")]
    InvalidPackName(String),

    #[error("Path not in pack: {0}")]
    PathNotInPack(String),

    #[error("Pack {0} is built, revert it first")]
    PackBuilt(String),

    #[error("Pack {0} is not built")]
    PackNotBuilt(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::StorageError(StorageError::IoError(err))
    }
}
