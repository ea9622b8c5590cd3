//! Seams to the outside world: rendering and audio.
//!
//! The controller calls these; it never reads anything back. Audio failures
//! are reported through `Result` so back ends can say what went wrong, but
//! the controller only logs them.

use crate::cards::{DeckEntry, FaceState};
use crate::core::AudioError;
use crate::progression::{RoundOutcome, RoundSummary};

/// Renders game state.
pub trait Presentation {
    /// Lay out a freshly dealt deck, face-down.
    fn render_deck(&mut self, entries: &[DeckEntry], grid_columns: u32);

    fn set_face_state(&mut self, slot: usize, state: FaceState);

    /// Session score as the player should see it.
    fn update_score(&mut self, score: u32);

    fn update_moves(&mut self, moves: u32);

    /// Countdown display; `remaining / total` drives the fuse bar.
    fn update_time_remaining(&mut self, remaining_secs: u32, total_secs: u32);

    fn update_chapter(&mut self, level: u8);

    fn show_low_time_warning(&mut self);

    fn clear_low_time_warning(&mut self);

    fn show_round_end_dialog(&mut self, outcome: RoundOutcome, summary: &RoundSummary);

    fn hide_round_end_dialog(&mut self);
}

/// Fire-and-forget sound.
pub trait AudioCues {
    fn play_match_cue(&mut self) -> Result<(), AudioError>;

    fn select_background_track_for_chapter(&mut self, level: u8) -> Result<(), AudioError>;
}

/// Presentation that draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn render_deck(&mut self, _entries: &[DeckEntry], _grid_columns: u32) {}
    fn set_face_state(&mut self, _slot: usize, _state: FaceState) {}
    fn update_score(&mut self, _score: u32) {}
    fn update_moves(&mut self, _moves: u32) {}
    fn update_time_remaining(&mut self, _remaining_secs: u32, _total_secs: u32) {}
    fn update_chapter(&mut self, _level: u8) {}
    fn show_low_time_warning(&mut self) {}
    fn clear_low_time_warning(&mut self) {}
    fn show_round_end_dialog(&mut self, _outcome: RoundOutcome, _summary: &RoundSummary) {}
    fn hide_round_end_dialog(&mut self) {}
}

/// Audio back end that plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioCues for SilentAudio {
    fn play_match_cue(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn select_background_track_for_chapter(&mut self, _level: u8) -> Result<(), AudioError> {
        Ok(())
    }
}
