//! Match engine: the two-card flip/match/mismatch protocol.
//!
//! `MatchEngine` owns one attempt's `RoundState`. Callers issue intents
//! (`select_card`, `evaluate_pair`, `tick`, preview start/end) and read the
//! state back; nobody else mutates it.

pub mod events;
pub mod round;

pub use events::{Evaluation, RejectReason, RoundEvent, RoundResult, SelectOutcome, TickOutcome};
pub use round::{MatchEngine, RoundPhase, RoundState};
