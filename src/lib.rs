//! # chapter-match
//!
//! Round-lifecycle engine for a timed memory-matching (concentration) game
//! played over escalating chapters.
//!
//! ## Design Principles
//!
//! 1. **Single Owner**: `GameController` owns every piece of mutable state.
//!    Other components receive intents and hand back values; there are no
//!    globals.
//!
//! 2. **One Transition, One Function**: each state change (select, evaluate,
//!    tick, preview start/end) has exactly one entry point on `MatchEngine`.
//!
//! 3. **Cancel Before Arm**: every timer kind has one slot; arming a kind
//!    cancels whatever it had pending, and a new round cancels everything.
//!
//! 4. **Deterministic Time**: a virtual clock drives all timers, so rounds can
//!    be replayed and tested to the millisecond.
//!
//! ## Modules
//!
//! - `core`: Configuration, errors, RNG
//! - `cards`: Card records, image pools, deck building
//! - `timer`: Virtual-clock scheduler and per-round timer slots
//! - `engine`: The flip/match/mismatch state machine
//! - `progression`: Chapters and the session score
//! - `game`: The controller and its presentation/audio seams

pub mod cards;
pub mod core;
pub mod engine;
pub mod game;
pub mod progression;
pub mod timer;

// Re-export commonly used types
pub use crate::core::{ChapterConfig, ChapterTable, GameConfig, GameError, GameRng, ScoringRules};

pub use crate::cards::{
    build_deck, AssetSource, CardId, CardRecord, DeckBuild, DeckEntry, DeckWarning, FaceState,
    ImagePool, NumberedImageSource,
};

pub use crate::engine::{
    Evaluation, MatchEngine, RejectReason, RoundEvent, RoundPhase, RoundResult, RoundState,
    SelectOutcome, TickOutcome,
};

pub use crate::progression::{
    ChapterProgression, ChapterStatus, RoundOutcome, RoundSummary, SessionState,
};

pub use crate::timer::{RoundTimer, Scheduler, TimerHandle, TimerKind};

pub use crate::game::{AudioCues, GameController, NullPresentation, Presentation, SilentAudio};
