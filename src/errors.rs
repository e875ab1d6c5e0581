// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::types::BucketId;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Bucket not found: {0}")]
    BucketNotFound(BucketId),

    #[error("Bucket {0} cannot depend on itself")]
    SelfDependency(BucketId),

    #[error("Dependency {bucket} -> {dependency} would create a cycle")]
    Cycle {
        bucket: BucketId,
        dependency: BucketId,
    },

    #[error("Dump bucket {0} does not take part in the dependency graph")]
    DumpBucket(BucketId),

    #[error("Layer {requested} for bucket {bucket} is outside its allowed range [{min:?}, {max:?}]")]
    LayerOutOfBounds {
        bucket: BucketId,
        requested: i64,
        min: Option<i64>,
        max: Option<i64>,
    },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BoardError>;
