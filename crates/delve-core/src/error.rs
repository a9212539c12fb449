//! Error types for configuration and generation

use thiserror::Error;

use crate::dungeon::{RoomKind, TileKind};

/// Configuration errors: unreadable, malformed, or inconsistent settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: String, reason: String },

    #[error("No asset configured for tile kind '{0}'")]
    MissingTileAsset(TileKind),

    #[error("No settings configured for room kind '{0}'")]
    MissingRoomKind(RoomKind),

    #[error("Treasure rooms are required but no decor type is tagged 'treasure'")]
    MissingTreasureDecor,

    #[error("No level configured with index {0}")]
    UnknownLevel(i32),
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that abort generation of a level
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Decor type '{0}' has no catalog entry")]
    MissingCatalogEntry(String),
}
