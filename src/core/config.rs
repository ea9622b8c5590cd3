//! Game configuration types.
//!
//! - `ChapterConfig`: one difficulty level (pairs, time limit, grid, preview)
//! - `ChapterTable`: the ordered, immutable list of chapters
//! - `ScoringRules`: points awarded per matched pair
//! - `GameConfig`: combines all of the above with round timing
//!
//! `GameConfig::default()` reproduces the shipped five-chapter game. Custom
//! tables can be loaded from JSON with [`GameConfig::from_json`].

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};

/// One chapter (difficulty level).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterConfig {
    /// 1-based level number.
    pub level: u8,

    /// Number of distinct pairs dealt.
    pub pair_count: usize,

    /// Countdown length.
    pub time_limit_secs: u32,

    /// Columns in the rendered grid.
    pub grid_columns: u32,

    /// How long every card is shown face-up before play.
    pub preview_secs: u32,
}

impl ChapterConfig {
    /// Create a chapter configuration.
    #[must_use]
    pub const fn new(
        level: u8,
        pair_count: usize,
        time_limit_secs: u32,
        grid_columns: u32,
        preview_secs: u32,
    ) -> Self {
        Self {
            level,
            pair_count,
            time_limit_secs,
            grid_columns,
            preview_secs,
        }
    }

    /// Total cards in a full deck for this chapter.
    #[must_use]
    pub const fn card_count(&self) -> usize {
        self.pair_count * 2
    }

    /// Rows needed to lay out a full deck.
    #[must_use]
    pub fn grid_rows(&self) -> u32 {
        if self.grid_columns == 0 {
            return 0;
        }
        (self.card_count() as u32).div_ceil(self.grid_columns)
    }

    /// Preview duration in milliseconds.
    #[must_use]
    pub const fn preview_ms(&self) -> u64 {
        self.preview_secs as u64 * 1000
    }
}

/// Ordered chapter list, indexed by level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterTable {
    chapters: Vec<ChapterConfig>,
}

impl Default for ChapterTable {
    fn default() -> Self {
        Self {
            chapters: vec![
                ChapterConfig::new(1, 4, 120, 4, 5),
                ChapterConfig::new(2, 8, 100, 4, 5),
                ChapterConfig::new(3, 12, 60, 6, 5),
                ChapterConfig::new(4, 16, 60, 8, 8),
                ChapterConfig::new(5, 20, 60, 10, 8),
            ],
        }
    }
}

impl ChapterTable {
    /// Build a table from chapters, validating levels and sizes.
    pub fn new(chapters: Vec<ChapterConfig>) -> ConfigResult<Self> {
        let table = Self { chapters };
        table.validate()?;
        Ok(table)
    }

    /// Look up a chapter by its 1-based level.
    #[must_use]
    pub fn get(&self, level: u8) -> Option<&ChapterConfig> {
        let index = usize::from(level).checked_sub(1)?;
        self.chapters.get(index)
    }

    /// The highest level (the final chapter).
    #[must_use]
    pub fn last_level(&self) -> u8 {
        self.chapters.last().map_or(0, |c| c.level)
    }

    /// Number of chapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// Check if the table has no chapters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Iterate over chapters in level order.
    pub fn iter(&self) -> impl Iterator<Item = &ChapterConfig> {
        self.chapters.iter()
    }

    /// Levels must run 1, 2, 3, ... and every size must be non-zero.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.chapters.is_empty() {
            return Err(ConfigError::EmptyChapterTable);
        }
        for (position, chapter) in self.chapters.iter().enumerate() {
            let expected = u8::try_from(position + 1).unwrap_or(u8::MAX);
            if chapter.level != expected {
                return Err(ConfigError::NonContiguousLevel {
                    position,
                    expected,
                    found: chapter.level,
                });
            }
            let zero_field = if chapter.pair_count == 0 {
                Some("pair_count")
            } else if chapter.time_limit_secs == 0 {
                Some("time_limit_secs")
            } else if chapter.grid_columns == 0 {
                Some("grid_columns")
            } else {
                None
            };
            if let Some(field) = zero_field {
                return Err(ConfigError::ZeroField {
                    level: chapter.level,
                    field,
                });
            }
        }
        Ok(())
    }
}

/// Points awarded for a matched pair: `base_points + time_remaining * time_bonus_per_second`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub base_points: u32,
    pub time_bonus_per_second: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_points: 100,
            time_bonus_per_second: 2,
        }
    }
}

impl ScoringRules {
    /// Points for a match found with `time_remaining_secs` left on the clock.
    #[must_use]
    pub fn points_for_match(&self, time_remaining_secs: u32) -> u32 {
        self.base_points
            .saturating_add(time_remaining_secs.saturating_mul(self.time_bonus_per_second))
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Chapters in play order.
    pub chapters: ChapterTable,

    /// Scoring for matched pairs.
    pub scoring: ScoringRules,

    /// Delay between revealing the second card and resolving the pair.
    pub evaluation_delay_ms: u64,

    /// Countdown tick period.
    pub tick_interval_ms: u64,

    /// Remaining seconds at which the low-time warning is raised.
    pub low_time_threshold_secs: u32,

    /// Delay between the end of a round and the round-end dialog.
    pub round_end_dialog_delay_ms: u64,

    /// Seed for deck dealing. Same seed produces the same decks.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            chapters: ChapterTable::default(),
            scoring: ScoringRules::default(),
            evaluation_delay_ms: 1000,
            tick_interval_ms: 1000,
            low_time_threshold_secs: 10,
            round_end_dialog_delay_ms: 1000,
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Parse and validate a configuration from JSON.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the chapter table and timing values.
    pub fn validate(&self) -> ConfigResult<()> {
        self.chapters.validate()?;
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }

    /// Set a custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set a custom chapter table.
    #[must_use]
    pub fn with_chapters(mut self, chapters: ChapterTable) -> Self {
        self.chapters = chapters;
        self
    }

    /// Set custom scoring rules.
    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringRules) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set a custom pair-evaluation delay.
    #[must_use]
    pub fn with_evaluation_delay_ms(mut self, delay_ms: u64) -> Self {
        self.evaluation_delay_ms = delay_ms;
        self
    }

    /// Set a custom round-end dialog delay.
    #[must_use]
    pub fn with_round_end_dialog_delay_ms(mut self, delay_ms: u64) -> Self {
        self.round_end_dialog_delay_ms = delay_ms;
        self
    }
}
