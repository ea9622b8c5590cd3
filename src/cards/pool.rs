//! Image pools: where card records come from.
//!
//! The game prefers portrait-oriented images. Orientation is probed once per
//! candidate when the pool is built; a failed probe counts as "not portrait"
//! and is never reported to the player.

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use super::record::{CardId, CardRecord};
use crate::core::AssetError;

/// Number of images shipped with the game.
pub const DEFAULT_IMAGE_COUNT: u32 = 184;

/// Supplies candidate card images.
pub trait AssetSource {
    /// Every image that could appear on a card.
    fn list_candidate_images(&self) -> Vec<CardRecord>;

    /// Whether the image is taller than it is wide.
    fn is_portrait_oriented(&self, image_ref: &str) -> Result<bool, AssetError>;
}

/// Numbered image set: ids `1..=count`, refs `"{i}.jpg"`.
///
/// Orientation is declared up front; anything not declared portrait is
/// landscape, and ids marked broken fail to probe.
#[derive(Clone, Debug, Default)]
pub struct NumberedImageSource {
    count: u32,
    portrait: FxHashSet<u32>,
    broken: FxHashSet<u32>,
}

impl NumberedImageSource {
    /// Create a source of `count` landscape images.
    #[must_use]
    pub fn new(count: u32) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    /// Create a source where every image is portrait.
    #[must_use]
    pub fn all_portrait(count: u32) -> Self {
        Self::new(count).with_portrait(1..=count)
    }

    /// Mark images as portrait (builder pattern).
    #[must_use]
    pub fn with_portrait(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.portrait.extend(ids);
        self
    }

    /// Mark images as failing to load (builder pattern).
    #[must_use]
    pub fn with_broken(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.broken.extend(ids);
        self
    }

    fn id_for_ref(image_ref: &str) -> Option<u32> {
        image_ref.strip_suffix(".jpg")?.parse().ok()
    }
}

impl AssetSource for NumberedImageSource {
    fn list_candidate_images(&self) -> Vec<CardRecord> {
        (1..=self.count)
            .map(|i| CardRecord::new(CardId::new(i), format!("Image {i}"), format!("{i}.jpg")))
            .collect()
    }

    fn is_portrait_oriented(&self, image_ref: &str) -> Result<bool, AssetError> {
        let id = Self::id_for_ref(image_ref)
            .filter(|id| (1..=self.count).contains(id))
            .ok_or_else(|| AssetError::NotFound(image_ref.to_string()))?;
        if self.broken.contains(&id) {
            return Err(AssetError::Decode(image_ref.to_string()));
        }
        Ok(self.portrait.contains(&id))
    }
}

/// Candidate images split by orientation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImagePool {
    all: Vec<CardRecord>,
    portrait: Vec<CardRecord>,
}

impl ImagePool {
    /// List and probe every candidate from `source`.
    pub fn probe<S: AssetSource + ?Sized>(source: &S) -> Self {
        let all = source.list_candidate_images();
        let portrait: Vec<CardRecord> = all
            .iter()
            .filter(|card| match source.is_portrait_oriented(&card.image_ref) {
                Ok(portrait) => portrait,
                Err(err) => {
                    debug!(image = %card.image_ref, error = %err, "orientation probe failed");
                    false
                }
            })
            .cloned()
            .collect();

        info!(total = all.len(), portrait = portrait.len(), "image pool ready");
        Self { all, portrait }
    }

    /// Whether there is nothing at all to deal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Every candidate image.
    #[must_use]
    pub fn all(&self) -> &[CardRecord] {
        &self.all
    }

    /// Portrait-oriented images only.
    #[must_use]
    pub fn portrait(&self) -> &[CardRecord] {
        &self.portrait
    }

    /// The pool to deal `pair_count` pairs from.
    ///
    /// Portrait images when there are enough of them, otherwise everything.
    #[must_use]
    pub fn for_pairs(&self, pair_count: usize) -> &[CardRecord] {
        if self.portrait.len() >= pair_count {
            &self.portrait
        } else {
            debug!(
                pair_count,
                portrait = self.portrait.len(),
                "too few portrait images, falling back to the full pool"
            );
            &self.all
        }
    }
}
