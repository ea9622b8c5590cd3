//! Round events and transition outcomes.
//!
//! The match engine never talks to the presentation layer. Each transition
//! pushes `RoundEvent`s into a buffer; the controller drains the buffer and
//! forwards the events to whatever renders them.

use serde::{Deserialize, Serialize};

use crate::cards::FaceState;

/// Something the presentation layer may want to show.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// Every card is face-up for the preview (display only).
    PreviewShown,
    /// Preview over; cards not matched are face-down again.
    PreviewHidden,
    /// A single slot changed face.
    FaceChanged { slot: usize, state: FaceState },
    /// Move counter for this attempt.
    MovesChanged(u32),
    /// Points earned in this attempt.
    ScoreChanged(u32),
    /// Countdown value after a tick.
    TimeChanged { remaining_secs: u32, total_secs: u32 },
    /// The countdown reached the low-time threshold.
    LowTimeWarning,
    /// Two slots were matched.
    PairMatched { first: usize, second: usize, points: u32 },
    /// The round reached a terminal state.
    RoundEnded(RoundResult),
}

/// Terminal result of one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundResult {
    Won,
    Lost,
}

/// Why a selection was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    /// Preview running, pair under evaluation, or round not started.
    InputLocked,
    /// No card at that slot.
    UnknownSlot,
    AlreadyRevealed,
    AlreadyMatched,
    /// The round has already been won or lost.
    RoundOver,
}

/// Result of [`MatchEngine::select_card`](super::MatchEngine::select_card).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Ignored; state unchanged.
    Rejected(RejectReason),
    /// First card of a pair turned over.
    Revealed {
        /// Set on the first accepted selection of the round.
        starts_countdown: bool,
    },
    /// Second card turned over; the pair waits for evaluation.
    PairPending,
}

impl SelectOutcome {
    /// Whether the selection changed anything.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, SelectOutcome::Rejected(_))
    }
}

/// Result of resolving a pending pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Evaluation {
    Matched { points: u32, round_won: bool },
    Mismatched,
}

/// Result of one countdown tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is not live (not started, or the round is over).
    Ignored,
    Ticked { remaining_secs: u32, low_time: bool },
    /// The countdown hit zero; the round is lost.
    Expired,
}
