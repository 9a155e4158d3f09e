use std::path::PathBuf;

use crate::game::CellPos;
use crate::pieces::PieceId;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Board invariant violations. These indicate a logic bug upstream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("cell ({}, {}) is already occupied", .0.col, .0.row)]
    CellOccupied(CellPos),

    #[error("cell ({}, {}) is outside the board", .0.col, .0.row)]
    OutOfBounds(CellPos),
}

/// Errors surfaced by the turn orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("invariant violation: {0}")]
    Invariant(#[from] BoardError),

    #[error("successful placement of piece {0} carried no cell")]
    MissingCell(PieceId),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
