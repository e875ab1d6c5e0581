// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{LayeringStrategy, LogLevel, OverridePolicy};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [board]
/// layering = "longest_path"
/// override_policy = "clamp"
/// max_task_title_len = 100
///
/// [storage]
/// dir = ".bucketdag"
/// key = "buckets"
/// autosave = true
///
/// [logging]
/// level = "info"
/// ```
///
/// All sections are optional and have reasonable defaults. This is the raw
/// form; use [`ConfigFile`] (obtained through `TryFrom`) everywhere else.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub board: BoardSection,

    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub board: BoardSection,
    pub storage: StorageSection,
    pub logging: LoggingSection,
}

impl ConfigFile {
    /// Build without validation. Only `validate.rs` should call this.
    pub(crate) fn new_unchecked(
        board: BoardSection,
        storage: StorageSection,
        logging: LoggingSection,
    ) -> Self {
        Self {
            board,
            storage,
            logging,
        }
    }

    /// The subset of settings the engine consumes.
    pub fn board_options(&self) -> BoardOptions {
        BoardOptions {
            layering: self.board.layering,
            override_policy: self.board.override_policy,
            max_task_title_len: self.board.max_task_title_len,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let raw = RawConfigFile::default();
        Self::new_unchecked(raw.board, raw.storage, raw.logging)
    }
}

/// `[board]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardSection {
    /// `"longest_path"` (default) or `"first_chain"`.
    #[serde(default)]
    pub layering: LayeringStrategy,

    /// `"clamp"` (default) or `"reject"`: how `set_layer` treats an override
    /// that contradicts the current dependency bounds.
    #[serde(default)]
    pub override_policy: OverridePolicy,

    /// Task titles are cut to this many characters.
    #[serde(default = "default_max_task_title_len")]
    pub max_task_title_len: usize,
}

fn default_max_task_title_len() -> usize {
    100
}

impl Default for BoardSection {
    fn default() -> Self {
        Self {
            layering: LayeringStrategy::default(),
            override_policy: OverridePolicy::default(),
            max_task_title_len: default_max_task_title_len(),
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    /// Directory of the file-backed key-value store.
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,

    /// Key under which the snapshot is stored.
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// Save the snapshot after every applied action.
    #[serde(default = "default_autosave")]
    pub autosave: bool,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".bucketdag")
}

fn default_storage_key() -> String {
    "buckets".to_string()
}

fn default_autosave() -> bool {
    true
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            key: default_storage_key(),
            autosave: default_autosave(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSection {
    /// If `None`, `BUCKETDAG_LOG` or `info` is used.
    #[serde(default)]
    pub level: Option<LogLevel>,
}

/// Engine options derived from `[board]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardOptions {
    pub layering: LayeringStrategy,
    pub override_policy: OverridePolicy,
    pub max_task_title_len: usize,
}

impl Default for BoardOptions {
    fn default() -> Self {
        ConfigFile::default().board_options()
    }
}
