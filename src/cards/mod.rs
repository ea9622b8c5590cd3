//! Card system: records, image pools, and deck building.
//!
//! ## Key Types
//!
//! - `CardId`: Pair identity
//! - `CardRecord`: A candidate image
//! - `AssetSource` / `ImagePool`: Where records come from, split by orientation
//! - `DeckEntry`: A record at a slot with a face state
//! - `build_deck`: Draw, duplicate and shuffle

pub mod deck;
pub mod pool;
pub mod record;

pub use deck::{build_deck, validate_deck, DeckBuild, DeckEntry, DeckWarning, FaceState};
pub use pool::{AssetSource, ImagePool, NumberedImageSource, DEFAULT_IMAGE_COUNT};
pub use record::{CardId, CardRecord};
