//! Shared test fixtures: recording adapters and deck helpers.

#![allow(dead_code)]

use rustc_hash::FxHashMap;

use chapter_match::cards::{CardId, DeckEntry, FaceState, NumberedImageSource};
use chapter_match::core::{AudioError, ChapterConfig, ChapterTable, GameConfig};
use chapter_match::game::{AudioCues, GameController, Presentation};
use chapter_match::progression::{RoundOutcome, RoundSummary};

/// Everything the controller asked the presentation to do, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    RenderDeck { cards: usize, grid_columns: u32 },
    Face(usize, FaceState),
    Score(u32),
    Moves(u32),
    Time(u32, u32),
    Chapter(u8),
    LowTimeOn,
    LowTimeOff,
    DialogShown(RoundOutcome, RoundSummary),
    DialogHidden,
}

#[derive(Debug, Default)]
pub struct RecordingPresentation {
    pub calls: Vec<Call>,
}

impl RecordingPresentation {
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn dialogs(&self) -> Vec<&RoundSummary> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::DialogShown(_, summary) => Some(summary),
                _ => None,
            })
            .collect()
    }

    pub fn last_score(&self) -> Option<u32> {
        self.calls.iter().rev().find_map(|call| match call {
            Call::Score(score) => Some(*score),
            _ => None,
        })
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls.iter().filter(|call| *call == wanted).count()
    }
}

impl Presentation for RecordingPresentation {
    fn render_deck(&mut self, entries: &[DeckEntry], grid_columns: u32) {
        self.calls.push(Call::RenderDeck {
            cards: entries.len(),
            grid_columns,
        });
    }

    fn set_face_state(&mut self, slot: usize, state: FaceState) {
        self.calls.push(Call::Face(slot, state));
    }

    fn update_score(&mut self, score: u32) {
        self.calls.push(Call::Score(score));
    }

    fn update_moves(&mut self, moves: u32) {
        self.calls.push(Call::Moves(moves));
    }

    fn update_time_remaining(&mut self, remaining_secs: u32, total_secs: u32) {
        self.calls.push(Call::Time(remaining_secs, total_secs));
    }

    fn update_chapter(&mut self, level: u8) {
        self.calls.push(Call::Chapter(level));
    }

    fn show_low_time_warning(&mut self) {
        self.calls.push(Call::LowTimeOn);
    }

    fn clear_low_time_warning(&mut self) {
        self.calls.push(Call::LowTimeOff);
    }

    fn show_round_end_dialog(&mut self, outcome: RoundOutcome, summary: &RoundSummary) {
        self.calls.push(Call::DialogShown(outcome, *summary));
    }

    fn hide_round_end_dialog(&mut self) {
        self.calls.push(Call::DialogHidden);
    }
}

/// Audio back end that counts cues and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub fail: bool,
    pub match_cues: usize,
    pub tracks: Vec<u8>,
}

impl RecordingAudio {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl AudioCues for RecordingAudio {
    fn play_match_cue(&mut self) -> Result<(), AudioError> {
        self.match_cues += 1;
        if self.fail {
            return Err(AudioError::Unavailable("muted".into()));
        }
        Ok(())
    }

    fn select_background_track_for_chapter(&mut self, level: u8) -> Result<(), AudioError> {
        self.tracks.push(level);
        if self.fail {
            return Err(AudioError::Unavailable("muted".into()));
        }
        Ok(())
    }
}

pub type TestGame = GameController<RecordingPresentation, RecordingAudio>;

/// A game on the shipped chapter table with 184 portrait images.
pub fn new_game() -> TestGame {
    game_with(GameConfig::default())
}

pub fn game_with(config: GameConfig) -> TestGame {
    game_from(&NumberedImageSource::all_portrait(184), config)
}

/// A game dealing from `source`.
pub fn game_from(source: &NumberedImageSource, config: GameConfig) -> TestGame {
    GameController::new(config, source, RecordingPresentation::default(), RecordingAudio::default())
        .expect("valid config and images")
}

/// A config whose chapters are tiny, for quick full play-throughs.
pub fn small_config(chapters: &[(usize, u32)]) -> GameConfig {
    let table = chapters
        .iter()
        .enumerate()
        .map(|(i, &(pairs, secs))| ChapterConfig::new(i as u8 + 1, pairs, secs, 4, 1))
        .collect();
    GameConfig::default().with_chapters(ChapterTable::new(table).expect("valid table"))
}

/// Slot pairs sharing an identity, ordered by first slot.
pub fn matching_pairs(deck: &[DeckEntry]) -> Vec<(usize, usize)> {
    let mut first_seen: FxHashMap<CardId, usize> = FxHashMap::default();
    let mut pairs = Vec::new();
    for entry in deck {
        match first_seen.remove(&entry.card.id) {
            Some(first) => pairs.push((first, entry.slot)),
            None => {
                first_seen.insert(entry.card.id, entry.slot);
            }
        }
    }
    pairs.sort_unstable();
    pairs
}

/// Two slots holding different identities.
pub fn mismatched_slots(deck: &[DeckEntry]) -> (usize, usize) {
    let first = &deck[0];
    let other = deck
        .iter()
        .find(|entry| entry.card.id != first.card.id)
        .expect("deck has at least two identities");
    (first.slot, other.slot)
}

/// Let the preview run out.
pub fn finish_preview(game: &mut TestGame) {
    let preview_ms = game.chapter().preview_ms();
    game.advance_time(preview_ms);
}

/// Match every pair in the current round, one evaluation delay each.
pub fn solve_round(game: &mut TestGame) {
    let delay = game.config().evaluation_delay_ms;
    for (a, b) in matching_pairs(&game.round().deck) {
        game.select_card(a);
        game.select_card(b);
        game.advance_time(delay);
    }
}
