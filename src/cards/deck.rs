//! Deck building: pick pairs from an image pool and shuffle them.
//!
//! ## Algorithm
//!
//! 1. De-duplicate the pool by `CardId` so unrelated identities never repeat.
//! 2. Draw `pair_count` distinct records uniformly without replacement.
//! 3. Duplicate the draw into `2 × pair_count` entries.
//! 4. Fisher–Yates shuffle, then stamp each entry with its final slot.
//!
//! A short pool is not an error: the builder deals every identity it has
//! and reports [`DeckWarning::AssetShortage`].

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::record::{CardId, CardRecord};
use crate::core::{DeckError, GameRng};

/// Which side of a card is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceState {
    #[default]
    Hidden,
    Revealed,
    Matched,
}

/// A card at a position in a dealt deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub card: CardRecord,
    /// 0-based position; always equal to the entry's index in the deck.
    pub slot: usize,
    pub state: FaceState,
}

impl DeckEntry {
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.state == FaceState::Hidden
    }
}

/// Degraded-mode notice from the deck builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckWarning {
    /// Fewer distinct images than requested pairs; the deck is smaller.
    AssetShortage { requested: usize, available: usize },
}

/// Result of [`build_deck`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckBuild {
    pub entries: Vec<DeckEntry>,
    pub warning: Option<DeckWarning>,
}

impl DeckBuild {
    /// Distinct identities actually dealt.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.entries.len() / 2
    }
}

/// Deal a shuffled deck of `pair_count` pairs drawn from `pool`.
///
/// ```
/// use chapter_match::cards::{build_deck, CardId, CardRecord};
/// use chapter_match::core::GameRng;
///
/// let pool: Vec<_> = (1..=10)
///     .map(|i| CardRecord::new(CardId::new(i), format!("Image {i}"), format!("{i}.jpg")))
///     .collect();
///
/// let deck = build_deck(&pool, 4, &mut GameRng::new(42));
/// assert_eq!(deck.entries.len(), 8);
/// assert!(deck.warning.is_none());
/// ```
pub fn build_deck(pool: &[CardRecord], pair_count: usize, rng: &mut GameRng) -> DeckBuild {
    let mut seen = FxHashSet::default();
    let distinct: Vec<&CardRecord> = pool.iter().filter(|card| seen.insert(card.id)).collect();

    let warning = if distinct.len() < pair_count {
        warn!(
            requested = pair_count,
            available = distinct.len(),
            "not enough distinct images for a full deck, dealing a smaller one"
        );
        Some(DeckWarning::AssetShortage {
            requested: pair_count,
            available: distinct.len(),
        })
    } else {
        None
    };

    let picked: Vec<&CardRecord> = rng
        .sample_indices(distinct.len(), pair_count)
        .into_iter()
        .map(|i| distinct[i])
        .collect();

    let mut cards: Vec<CardRecord> = picked
        .iter()
        .chain(picked.iter())
        .map(|card| (*card).clone())
        .collect();
    rng.shuffle(&mut cards);

    let entries = cards
        .into_iter()
        .enumerate()
        .map(|(slot, card)| DeckEntry {
            card,
            slot,
            state: FaceState::Hidden,
        })
        .collect();

    DeckBuild { entries, warning }
}

/// Check that every identity appears exactly twice and slots match indices.
pub fn validate_deck(entries: &[DeckEntry]) -> Result<(), DeckError> {
    let mut counts: FxHashMap<CardId, usize> = FxHashMap::default();
    for (index, entry) in entries.iter().enumerate() {
        if entry.slot != index {
            return Err(DeckError::SlotMismatch {
                index,
                slot: entry.slot,
            });
        }
        *counts.entry(entry.card.id).or_default() += 1;
    }

    let mut unpaired: Vec<_> = counts.into_iter().filter(|&(_, count)| count != 2).collect();
    unpaired.sort_unstable();
    match unpaired.first() {
        Some(&(id, count)) => Err(DeckError::UnpairedCard { id, count }),
        None => Ok(()),
    }
}
