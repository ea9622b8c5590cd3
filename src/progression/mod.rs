//! Chapter progression and the session that survives across chapters.
//!
//! ## States
//!
//! ```text
//! Active(n) --win--> Cleared(n) --advance--> Active(n + 1)
//! Active(last) --win--> Completed
//! Active(n) --timeout--> Failed(n) --retry--> Active(n)
//! any --restart--> Active(1)
//! ```
//!
//! Round points are committed to the session only when a chapter is cleared.
//! A failed attempt's points are dropped, so a retry starts from the score of
//! the chapters already cleared.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::{ChapterConfig, ChapterTable};
use crate::engine::RoundState;

/// Progress kept across chapters within one play-through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub current_chapter_level: u8,
    /// Score of cleared chapters.
    pub cumulative_score: u32,
    /// Moves of cleared chapters.
    pub total_moves: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current_chapter_level: 1,
            cumulative_score: 0,
            total_moves: 0,
        }
    }
}

/// Where the play-through stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChapterStatus {
    Active(u8),
    Cleared(u8),
    Failed(u8),
    /// The last chapter was cleared.
    Completed,
}

impl ChapterStatus {
    /// Whether a round is being played.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, ChapterStatus::Active(_))
    }
}

/// Outcome shown in the round-end dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    ChapterCleared,
    GameCompleted,
    TimeExpired,
}

/// Numbers shown in the round-end dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub outcome: RoundOutcome,
    pub level: u8,
    /// Session score, including this round when it was a win.
    pub score: u32,
    /// This round's moves, or the session total for `GameCompleted`.
    pub moves: u32,
    pub time_remaining_secs: u32,
    pub matched_pairs: usize,
    pub pair_count: usize,
}

/// Tracks the current chapter and the session totals.
#[derive(Clone, Debug)]
pub struct ChapterProgression {
    table: ChapterTable,
    session: SessionState,
    status: ChapterStatus,
}

impl ChapterProgression {
    /// Start at chapter 1 with an empty session.
    #[must_use]
    pub fn new(table: ChapterTable) -> Self {
        Self {
            table,
            session: SessionState::default(),
            status: ChapterStatus::Active(1),
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn status(&self) -> ChapterStatus {
        self.status
    }

    /// Configuration of the chapter at the session's current level.
    #[must_use]
    pub fn current_chapter(&self) -> Option<&ChapterConfig> {
        self.table.get(self.session.current_chapter_level)
    }

    /// Whether the current level is the final chapter.
    #[must_use]
    pub fn on_last_chapter(&self) -> bool {
        self.session.current_chapter_level >= self.table.last_level()
    }

    /// Commit a won round. Returns `Cleared` or, on the last chapter, `Completed`.
    pub fn record_win(&mut self, round_score: u32, round_moves: u32) -> ChapterStatus {
        let ChapterStatus::Active(level) = self.status else {
            warn!(status = ?self.status, "win recorded outside an active chapter");
            return self.status;
        };
        self.session.cumulative_score = self.session.cumulative_score.saturating_add(round_score);
        self.session.total_moves = self.session.total_moves.saturating_add(round_moves);

        self.status = if self.on_last_chapter() {
            info!(
                score = self.session.cumulative_score,
                moves = self.session.total_moves,
                "all chapters cleared"
            );
            ChapterStatus::Completed
        } else {
            info!(level, score = self.session.cumulative_score, "chapter cleared");
            ChapterStatus::Cleared(level)
        };
        self.status
    }

    /// Record a timed-out round. Its points are not committed.
    pub fn record_loss(&mut self) -> ChapterStatus {
        if let ChapterStatus::Active(level) = self.status {
            info!(level, "chapter failed");
            self.status = ChapterStatus::Failed(level);
        }
        self.status
    }

    /// Cleared(n) -> Active(n + 1).
    pub fn advance(&mut self) -> ChapterStatus {
        if let ChapterStatus::Cleared(level) = self.status {
            let next = level + 1;
            self.session.current_chapter_level = next;
            self.status = ChapterStatus::Active(next);
            debug!(level = next, "advanced to next chapter");
        }
        self.status
    }

    /// Failed(n) -> Active(n).
    pub fn retry(&mut self) -> ChapterStatus {
        if let ChapterStatus::Failed(level) = self.status {
            self.status = ChapterStatus::Active(level);
            debug!(level, "retrying chapter");
        }
        self.status
    }

    /// Back to chapter 1 with nothing carried over.
    pub fn restart(&mut self) -> ChapterStatus {
        self.session = SessionState::default();
        self.status = ChapterStatus::Active(1);
        debug!("session restarted");
        self.status
    }

    /// Debug shortcut: jump to the next chapter without scoring.
    ///
    /// Does nothing on the last chapter. Returns whether the level changed.
    pub fn skip_chapter(&mut self) -> bool {
        if self.on_last_chapter() {
            warn!(level = self.session.current_chapter_level, "already on the last chapter");
            return false;
        }
        let next = self.session.current_chapter_level + 1;
        self.session.current_chapter_level = next;
        self.status = ChapterStatus::Active(next);
        info!(level = next, "skipped to chapter");
        true
    }

    /// Dialog summary for the current status and the round just finished.
    ///
    /// `None` while a chapter is still active.
    #[must_use]
    pub fn summary(&self, round: &RoundState) -> Option<RoundSummary> {
        let (outcome, level, score, moves) = match self.status {
            ChapterStatus::Active(_) => return None,
            ChapterStatus::Cleared(level) => (
                RoundOutcome::ChapterCleared,
                level,
                self.session.cumulative_score,
                round.moves,
            ),
            ChapterStatus::Completed => (
                RoundOutcome::GameCompleted,
                self.session.current_chapter_level,
                self.session.cumulative_score,
                self.session.total_moves,
            ),
            ChapterStatus::Failed(level) => (
                RoundOutcome::TimeExpired,
                level,
                self.session.cumulative_score.saturating_add(round.score),
                round.moves,
            ),
        };
        Some(RoundSummary {
            outcome,
            level,
            score,
            moves,
            time_remaining_secs: round.time_remaining_secs,
            matched_pairs: round.matched_pairs,
            pair_count: round.pair_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_advances() {
        let mut progression = ChapterProgression::new(ChapterTable::default());
        assert_eq!(progression.record_win(500, 6), ChapterStatus::Cleared(1));
        assert_eq!(progression.session().current_chapter_level, 1);
        assert_eq!(progression.advance(), ChapterStatus::Active(2));
        assert_eq!(progression.session().current_chapter_level, 2);
        assert_eq!(progression.session().cumulative_score, 500);
        assert_eq!(progression.current_chapter().unwrap().pair_count, 8);
    }

    #[test]
    fn test_last_chapter_completes() {
        let mut progression = ChapterProgression::new(ChapterTable::default());
        for _ in 1..5 {
            progression.record_win(100, 1);
            progression.advance();
        }
        assert_eq!(progression.record_win(100, 1), ChapterStatus::Completed);
        // No chapter 6.
        assert_eq!(progression.advance(), ChapterStatus::Completed);
        assert_eq!(progression.session().current_chapter_level, 5);
        assert_eq!(progression.session().total_moves, 5);
    }

    #[test]
    fn test_loss_and_retry_keep_cleared_score() {
        let mut progression = ChapterProgression::new(ChapterTable::default());
        progression.record_win(400, 4);
        progression.advance();
        assert_eq!(progression.record_loss(), ChapterStatus::Failed(2));
        assert!(!progression.status().is_active());
        assert_eq!(progression.retry(), ChapterStatus::Active(2));
        assert!(progression.status().is_active());
        assert_eq!(progression.session().cumulative_score, 400);
    }

    #[test]
    fn test_restart_clears_everything() {
        let mut progression = ChapterProgression::new(ChapterTable::default());
        progression.record_win(400, 4);
        progression.advance();
        assert_eq!(progression.restart(), ChapterStatus::Active(1));
        assert_eq!(*progression.session(), SessionState::default());
    }

    #[test]
    fn test_skip_stops_at_last() {
        let mut progression = ChapterProgression::new(ChapterTable::default());
        for expected in 2..=5 {
            assert!(progression.skip_chapter());
            assert_eq!(progression.status(), ChapterStatus::Active(expected));
        }
        assert!(!progression.skip_chapter());
        assert_eq!(progression.session().current_chapter_level, 5);
        assert_eq!(progression.session().cumulative_score, 0);
    }

    #[test]
    fn test_transitions_ignored_from_wrong_status() {
        let mut progression = ChapterProgression::new(ChapterTable::default());
        assert_eq!(progression.advance(), ChapterStatus::Active(1));
        assert_eq!(progression.retry(), ChapterStatus::Active(1));

        progression.record_loss();
        assert_eq!(progression.record_win(100, 1), ChapterStatus::Failed(1));
        assert_eq!(progression.session().cumulative_score, 0);
    }
}
