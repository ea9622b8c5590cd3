//! Timing: a deterministic virtual clock and the round's timer slots.
//!
//! Nothing here sleeps or spawns. The controller advances the clock and
//! dispatches whatever became due, one task at a time.

pub mod round_timer;
pub mod scheduler;

pub use round_timer::{RoundTimer, TimerKind};
pub use scheduler::{Scheduler, TimerHandle};
