//! Game controller and the adapter traits it drives.

pub mod adapter;
pub mod controller;

pub use adapter::{AudioCues, NullPresentation, Presentation, SilentAudio};
pub use controller::GameController;
