//! The round state machine.
//!
//! ```text
//! Idle -> Previewing -> AwaitingFirstPick -> OnePicked -> Evaluating
//!                             ^                              |
//!                             +------------------------------+--> Won | Lost
//! ```
//!
//! Every transition has exactly one entry point on [`MatchEngine`]. None of
//! them touch a clock: the controller decides *when* they run.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use super::events::{Evaluation, RejectReason, RoundEvent, RoundResult, SelectOutcome, TickOutcome};
use crate::cards::{DeckEntry, FaceState};
use crate::core::{ChapterConfig, ScoringRules};

/// Where a round is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Dealt, preview not yet started.
    #[default]
    Idle,
    Previewing,
    /// Waiting for the first card of a pair.
    AwaitingFirstPick,
    OnePicked,
    /// Two cards revealed, waiting for the evaluation delay.
    Evaluating,
    Won,
    Lost,
}

impl RoundPhase {
    /// Won or lost.
    #[must_use]
    pub fn is_over(self) -> bool {
        matches!(self, RoundPhase::Won | RoundPhase::Lost)
    }
}

/// State of one chapter attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub deck: Vec<DeckEntry>,
    /// Selection buffer, at most two slots.
    pub revealed_slots: SmallVec<[usize; 2]>,
    /// Pairs needed to win: distinct identities actually dealt.
    pub pair_count: usize,
    pub matched_pairs: usize,
    pub moves: u32,
    /// Points earned in this attempt.
    pub score: u32,
    pub time_remaining_secs: u32,
    pub total_time_secs: u32,
    pub input_locked: bool,
    /// Set by the first accepted selection; the countdown runs from then.
    pub round_started: bool,
    pub preview_active: bool,
    pub phase: RoundPhase,
}

impl RoundState {
    /// Fresh state for a newly dealt deck.
    #[must_use]
    pub fn new(deck: Vec<DeckEntry>, time_limit_secs: u32) -> Self {
        let pair_count = deck.len() / 2;
        Self {
            deck,
            revealed_slots: SmallVec::new(),
            pair_count,
            matched_pairs: 0,
            moves: 0,
            score: 0,
            time_remaining_secs: time_limit_secs,
            total_time_secs: time_limit_secs,
            input_locked: true,
            round_started: false,
            preview_active: false,
            phase: RoundPhase::Idle,
        }
    }

    /// Whether the countdown should be ticking.
    #[must_use]
    pub fn countdown_live(&self) -> bool {
        self.round_started && !self.phase.is_over()
    }
}

/// Owns a [`RoundState`] and applies every transition to it.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    chapter: ChapterConfig,
    scoring: ScoringRules,
    low_time_threshold_secs: u32,
    state: RoundState,
    events: Vec<RoundEvent>,
}

impl MatchEngine {
    /// Create an engine for one attempt at `chapter`.
    #[must_use]
    pub fn new(
        chapter: ChapterConfig,
        deck: Vec<DeckEntry>,
        scoring: ScoringRules,
        low_time_threshold_secs: u32,
    ) -> Self {
        Self {
            state: RoundState::new(deck, chapter.time_limit_secs),
            chapter,
            scoring,
            low_time_threshold_secs,
            events: Vec::new(),
        }
    }

    /// Read-only view of the round.
    #[must_use]
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    #[must_use]
    pub fn chapter(&self) -> &ChapterConfig {
        &self.chapter
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.state.phase
    }

    /// Take the events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    /// Idle -> Previewing. Locks input.
    pub fn begin_preview(&mut self) {
        if self.state.phase != RoundPhase::Idle {
            return;
        }
        self.state.phase = RoundPhase::Previewing;
        self.state.preview_active = true;
        self.state.input_locked = true;
        self.events.push(RoundEvent::PreviewShown);
        debug!(level = self.chapter.level, "preview started");
    }

    /// Previewing -> AwaitingFirstPick. Unlocks input.
    pub fn end_preview(&mut self) {
        if self.state.phase != RoundPhase::Previewing {
            return;
        }
        for entry in &mut self.state.deck {
            if entry.state != FaceState::Matched {
                entry.state = FaceState::Hidden;
            }
        }
        self.state.phase = RoundPhase::AwaitingFirstPick;
        self.state.preview_active = false;
        self.state.input_locked = false;
        self.events.push(RoundEvent::PreviewHidden);
        debug!(level = self.chapter.level, "preview ended");
    }

    /// Turn over the card at `slot`.
    pub fn select_card(&mut self, slot: usize) -> SelectOutcome {
        if let Some(reason) = self.rejection(slot) {
            return SelectOutcome::Rejected(reason);
        }

        let starts_countdown = !self.state.round_started;
        self.state.round_started = true;

        self.state.deck[slot].state = FaceState::Revealed;
        self.state.revealed_slots.push(slot);
        self.events.push(RoundEvent::FaceChanged {
            slot,
            state: FaceState::Revealed,
        });

        if self.state.revealed_slots.len() < 2 {
            self.state.phase = RoundPhase::OnePicked;
            return SelectOutcome::Revealed { starts_countdown };
        }

        self.state.input_locked = true;
        self.state.moves += 1;
        self.state.phase = RoundPhase::Evaluating;
        self.events.push(RoundEvent::MovesChanged(self.state.moves));
        SelectOutcome::PairPending
    }

    fn rejection(&self, slot: usize) -> Option<RejectReason> {
        if self.state.phase.is_over() {
            return Some(RejectReason::RoundOver);
        }
        if self.state.input_locked {
            return Some(RejectReason::InputLocked);
        }
        match self.state.deck.get(slot).map(|entry| entry.state) {
            None => Some(RejectReason::UnknownSlot),
            Some(FaceState::Revealed) => Some(RejectReason::AlreadyRevealed),
            Some(FaceState::Matched) => Some(RejectReason::AlreadyMatched),
            Some(FaceState::Hidden) => None,
        }
    }

    /// Resolve the two revealed cards.
    ///
    /// Returns `None` unless a pair is waiting.
    pub fn evaluate_pair(&mut self) -> Option<Evaluation> {
        if self.state.phase != RoundPhase::Evaluating {
            return None;
        }
        let [first, second] = match self.state.revealed_slots.as_slice() {
            &[first, second] => [first, second],
            _ => return None,
        };
        self.state.revealed_slots.clear();

        let is_match = self.state.deck[first].card.id == self.state.deck[second].card.id;
        let outcome = if is_match {
            self.apply_match(first, second)
        } else {
            for slot in [first, second] {
                self.state.deck[slot].state = FaceState::Hidden;
                self.events.push(RoundEvent::FaceChanged {
                    slot,
                    state: FaceState::Hidden,
                });
            }
            Evaluation::Mismatched
        };

        if !self.state.phase.is_over() {
            self.state.phase = RoundPhase::AwaitingFirstPick;
            self.state.input_locked = false;
        }
        Some(outcome)
    }

    fn apply_match(&mut self, first: usize, second: usize) -> Evaluation {
        for slot in [first, second] {
            self.state.deck[slot].state = FaceState::Matched;
            self.events.push(RoundEvent::FaceChanged {
                slot,
                state: FaceState::Matched,
            });
        }
        self.state.matched_pairs += 1;

        let points = self.scoring.points_for_match(self.state.time_remaining_secs);
        self.state.score = self.state.score.saturating_add(points);
        self.events.push(RoundEvent::PairMatched { first, second, points });
        self.events.push(RoundEvent::ScoreChanged(self.state.score));

        let round_won = self.state.matched_pairs >= self.state.pair_count;
        if round_won {
            self.finish(RoundResult::Won);
        }
        Evaluation::Matched { points, round_won }
    }

    /// One countdown second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.countdown_live() {
            return TickOutcome::Ignored;
        }

        self.state.time_remaining_secs = self.state.time_remaining_secs.saturating_sub(1);
        let remaining_secs = self.state.time_remaining_secs;
        self.events.push(RoundEvent::TimeChanged {
            remaining_secs,
            total_secs: self.state.total_time_secs,
        });

        if remaining_secs == 0 {
            self.finish(RoundResult::Lost);
            return TickOutcome::Expired;
        }

        let low_time = remaining_secs == self.low_time_threshold_secs;
        if low_time {
            self.events.push(RoundEvent::LowTimeWarning);
        }
        TickOutcome::Ticked {
            remaining_secs,
            low_time,
        }
    }

    fn finish(&mut self, result: RoundResult) {
        self.state.phase = match result {
            RoundResult::Won => RoundPhase::Won,
            RoundResult::Lost => RoundPhase::Lost,
        };
        self.state.input_locked = true;
        self.events.push(RoundEvent::RoundEnded(result));
        info!(
            level = self.chapter.level,
            ?result,
            matched = self.state.matched_pairs,
            pairs = self.state.pair_count,
            moves = self.state.moves,
            score = self.state.score,
            "round over"
        );
    }
}
