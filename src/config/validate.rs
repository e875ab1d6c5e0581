// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{BoardError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = BoardError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.board, raw.storage, raw.logging))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_board(cfg)?;
    validate_storage(cfg)?;
    Ok(())
}

fn validate_board(cfg: &RawConfigFile) -> Result<()> {
    if cfg.board.max_task_title_len == 0 {
        return Err(BoardError::ConfigError(
            "[board].max_task_title_len must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_storage(cfg: &RawConfigFile) -> Result<()> {
    let key = cfg.storage.key.trim();
    if key.is_empty() {
        return Err(BoardError::ConfigError(
            "[storage].key must not be empty".to_string(),
        ));
    }
    if key.contains(['/', '\\']) || key == "." || key == ".." {
        return Err(BoardError::ConfigError(format!(
            "[storage].key '{}' must be a plain name, not a path",
            cfg.storage.key
        )));
    }
    Ok(())
}
