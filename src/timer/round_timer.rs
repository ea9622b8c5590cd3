//! Per-round timer slots with cancel-before-arm.
//!
//! Each [`TimerKind`] owns at most one pending handle. Arming a kind cancels
//! whatever that kind had pending first, so two previews (or two countdowns)
//! can never overlap. A firing is honoured only if its handle is the one
//! currently armed for its kind.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::scheduler::{Scheduler, TimerHandle};

/// The timed mechanisms of one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// One-shot: end of the face-up preview.
    Preview,
    /// Repeating: one countdown second.
    Countdown,
    /// One-shot: resolve the two revealed cards.
    Evaluation,
    /// One-shot: show the round-end dialog.
    RoundEndDialog,
}

impl TimerKind {
    pub const ALL: [TimerKind; 4] = [
        TimerKind::Preview,
        TimerKind::Countdown,
        TimerKind::Evaluation,
        TimerKind::RoundEndDialog,
    ];

    const fn index(self) -> usize {
        match self {
            TimerKind::Preview => 0,
            TimerKind::Countdown => 1,
            TimerKind::Evaluation => 2,
            TimerKind::RoundEndDialog => 3,
        }
    }
}

/// Armed handles, one slot per kind.
#[derive(Clone, Debug, Default)]
pub struct RoundTimer {
    slots: [Option<TimerHandle>; 4],
}

impl RoundTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the preview; fires once after `preview_ms`.
    pub fn arm_preview(&mut self, sched: &mut Scheduler<TimerKind>, preview_ms: u64) -> TimerHandle {
        self.arm_once(sched, TimerKind::Preview, preview_ms)
    }

    /// Arm the countdown; fires every `tick_ms`.
    pub fn arm_countdown(&mut self, sched: &mut Scheduler<TimerKind>, tick_ms: u64) -> TimerHandle {
        self.cancel(sched, TimerKind::Countdown);
        let handle = sched.schedule_repeating(TimerKind::Countdown, tick_ms);
        self.slots[TimerKind::Countdown.index()] = Some(handle);
        debug!(%handle, tick_ms, "countdown armed");
        handle
    }

    /// Arm a one-shot timer of `kind`.
    pub fn arm_once(
        &mut self,
        sched: &mut Scheduler<TimerKind>,
        kind: TimerKind,
        delay_ms: u64,
    ) -> TimerHandle {
        self.cancel(sched, kind);
        let handle = sched.schedule_once(kind, delay_ms);
        self.slots[kind.index()] = Some(handle);
        debug!(%handle, ?kind, delay_ms, "timer armed");
        handle
    }

    /// Cancel the pending timer of `kind`, if any.
    pub fn cancel(&mut self, sched: &mut Scheduler<TimerKind>, kind: TimerKind) {
        if let Some(handle) = self.slots[kind.index()].take() {
            if sched.cancel(handle) {
                debug!(%handle, ?kind, "timer cancelled");
            }
        }
    }

    /// Cancel every timer of this round.
    pub fn cancel_all(&mut self, sched: &mut Scheduler<TimerKind>) {
        for kind in TimerKind::ALL {
            self.cancel(sched, kind);
        }
    }

    /// The handle armed for `kind`.
    #[must_use]
    pub fn armed(&self, kind: TimerKind) -> Option<TimerHandle> {
        self.slots[kind.index()]
    }

    /// Accept a firing from the scheduler.
    ///
    /// Returns `false` for a handle that is no longer armed. One-shot slots
    /// are cleared on acceptance; the countdown stays armed.
    pub fn claim(&mut self, kind: TimerKind, handle: TimerHandle) -> bool {
        let slot = &mut self.slots[kind.index()];
        if *slot != Some(handle) {
            debug!(%handle, ?kind, "ignoring stale timer firing");
            return false;
        }
        if kind != TimerKind::Countdown {
            *slot = None;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rearm_cancels_previous() {
        let mut sched = Scheduler::new();
        let mut timer = RoundTimer::new();

        let first = timer.arm_preview(&mut sched, 5000);
        let second = timer.arm_preview(&mut sched, 5000);

        assert_ne!(first, second);
        assert!(!sched.is_pending(first));
        assert!(sched.is_pending(second));
        assert_eq!(sched.pending_count(), 1);
    }

    #[test]
    fn test_countdown_rearm_single_pending() {
        let mut sched = Scheduler::new();
        let mut timer = RoundTimer::new();
        timer.arm_countdown(&mut sched, 1000);
        timer.arm_countdown(&mut sched, 1000);
        assert_eq!(sched.pending_count(), 1);
    }

    #[test]
    fn test_cancel_all() {
        let mut sched = Scheduler::new();
        let mut timer = RoundTimer::new();
        timer.arm_preview(&mut sched, 5000);
        timer.arm_countdown(&mut sched, 1000);
        timer.arm_once(&mut sched, TimerKind::Evaluation, 1000);
        timer.arm_once(&mut sched, TimerKind::RoundEndDialog, 1000);
        assert_eq!(sched.pending_count(), 4);

        timer.cancel_all(&mut sched);
        assert_eq!(sched.pending_count(), 0);
        assert!(TimerKind::ALL.iter().all(|&kind| timer.armed(kind).is_none()));

        // Cancelling again is harmless.
        timer.cancel_all(&mut sched);
    }

    #[test]
    fn test_claim_rejects_stale() {
        let mut sched = Scheduler::new();
        let mut timer = RoundTimer::new();
        let old = timer.arm_preview(&mut sched, 5000);
        let new = timer.arm_preview(&mut sched, 5000);

        assert!(!timer.claim(TimerKind::Preview, old));
        assert!(timer.claim(TimerKind::Preview, new));
        // One-shot slot is cleared once claimed.
        assert!(!timer.claim(TimerKind::Preview, new));
    }

    #[test]
    fn test_claim_keeps_countdown_armed() {
        let mut sched = Scheduler::new();
        let mut timer = RoundTimer::new();
        let handle = timer.arm_countdown(&mut sched, 1000);
        assert!(timer.claim(TimerKind::Countdown, handle));
        assert!(timer.claim(TimerKind::Countdown, handle));
        assert_eq!(timer.armed(TimerKind::Countdown), Some(handle));
    }
}
