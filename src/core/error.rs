//! Error types.
//!
//! Nothing here is fatal during play. Configuration errors surface when a
//! controller is built; asset and audio errors are absorbed by the caller.

use thiserror::Error;

use crate::cards::CardId;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors raised while validating or parsing a [`GameConfig`](super::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("chapter table is empty")]
    EmptyChapterTable,

    #[error("chapter at position {position} has level {found}, expected {expected}")]
    NonContiguousLevel {
        position: usize,
        expected: u8,
        found: u8,
    },

    #[error("chapter {level}: {field} must be greater than zero")]
    ZeroField { level: u8, field: &'static str },

    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pair-invariant violations found by [`validate_deck`](crate::cards::validate_deck).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("card {id} appears {count} times, expected 2")]
    UnpairedCard { id: CardId, count: usize },

    #[error("entry at index {index} claims slot {slot}")]
    SlotMismatch { index: usize, slot: usize },
}

/// Failure while probing an image's orientation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("image not found: {0}")]
    NotFound(String),

    #[error("image failed to decode: {0}")]
    Decode(String),
}

/// Failure reported by an audio back end.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AudioError {
    #[error("audio playback unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error for building a game controller.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no chapter configured for level {0}")]
    UnknownChapter(u8),

    #[error("asset source offered no images to deal")]
    NoImages,
}
