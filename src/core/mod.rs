//! Core types: configuration, errors, RNG.
//!
//! Chapters, timing and scoring are data (`GameConfig`), not code. The
//! engine reads them; it never hardcodes a level.

pub mod config;
pub mod error;
pub mod rng;

pub use config::{ChapterConfig, ChapterTable, GameConfig, ScoringRules};
pub use error::{AssetError, AudioError, ConfigError, ConfigResult, DeckError, GameError};
pub use rng::GameRng;
