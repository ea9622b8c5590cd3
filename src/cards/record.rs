//! Card records - the matchable images.
//!
//! A `CardRecord` is static data: which image a card shows. Two records
//! with the same `CardId` form a pair. Position and face state live in
//! [`DeckEntry`](super::DeckEntry).

use serde::{Deserialize, Serialize};

/// Identity of a matchable image.
///
/// Two deck entries with equal `CardId` are a pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A candidate card image.
///
/// ```
/// use chapter_match::cards::{CardId, CardRecord};
///
/// let card = CardRecord::new(CardId::new(3), "Image 3", "3.jpg");
/// assert_eq!(card.image_ref, "3.jpg");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardRecord {
    /// Pair identity.
    pub id: CardId,

    /// Display name (alt text).
    pub name: String,

    /// Reference the presentation layer resolves to an image.
    pub image_ref: String,
}

impl CardRecord {
    /// Create a new card record.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, image_ref: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image_ref: image_ref.into(),
        }
    }
}
