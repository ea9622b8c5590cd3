//! Single-threaded virtual-clock scheduler.
//!
//! Callbacks are not stored here: the scheduler only tracks *when* a task of
//! some kind is due. The owner drives the clock with [`Scheduler::pop_due`]
//! and dispatches on the returned kind, so every firing runs to completion
//! before the next one is looked at.
//!
//! ## Ordering
//!
//! Due tasks come out by due time, then by arming order. A repeating task is
//! re-armed (with a fresh arming sequence) before it is handed out, so
//! cancelling it from inside its own dispatch stops it for good.
//!
//! ```
//! use chapter_match::timer::Scheduler;
//!
//! let mut sched: Scheduler<&str> = Scheduler::new();
//! let handle = sched.schedule_once("ping", 1000);
//!
//! assert!(sched.pop_due(999).is_none());
//! assert_eq!(sched.pop_due(1000), Some((handle, "ping")));
//! assert!(!sched.cancel(handle)); // already fired; cancel is idempotent
//! ```

use serde::{Deserialize, Serialize};

/// Handle to a scheduled task. Cancelling twice is harmless.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Get the raw handle value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

#[derive(Clone, Debug)]
struct ScheduledTask<K> {
    handle: TimerHandle,
    kind: K,
    due_ms: u64,
    period_ms: Option<u64>,
    /// Arming order, for deterministic tie-breaks.
    seq: u64,
}

/// Virtual clock plus pending one-shot and repeating tasks.
#[derive(Clone, Debug)]
pub struct Scheduler<K> {
    now_ms: u64,
    next_handle: u64,
    next_seq: u64,
    tasks: Vec<ScheduledTask<K>>,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_handle: 1,
            next_seq: 0,
            tasks: Vec::new(),
        }
    }
}

impl<K: Copy> Scheduler<K> {
    /// Create a scheduler with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Fire once, `delay_ms` from now.
    pub fn schedule_once(&mut self, kind: K, delay_ms: u64) -> TimerHandle {
        self.push(kind, delay_ms, None)
    }

    /// Fire every `period_ms`, first firing one period from now.
    ///
    /// A zero period is treated as 1 ms so the clock always advances.
    pub fn schedule_repeating(&mut self, kind: K, period_ms: u64) -> TimerHandle {
        let period_ms = period_ms.max(1);
        self.push(kind, period_ms, Some(period_ms))
    }

    fn push(&mut self, kind: K, delay_ms: u64, period_ms: Option<u64>) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let seq = self.bump_seq();
        self.tasks.push(ScheduledTask {
            handle,
            kind,
            due_ms: self.now_ms.saturating_add(delay_ms),
            period_ms,
            seq,
        });
        handle
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Cancel a task. Returns `true` if it was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.handle != handle);
        self.tasks.len() != before
    }

    /// Check if a task is still pending.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.tasks.iter().any(|task| task.handle == handle)
    }

    /// When a pending task is next due.
    #[must_use]
    pub fn due_at(&self, handle: TimerHandle) -> Option<u64> {
        self.tasks
            .iter()
            .find(|task| task.handle == handle)
            .map(|task| task.due_ms)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Take the earliest task due at or before `until_ms`.
    ///
    /// Moves the clock to the task's due time. Repeating tasks are re-armed
    /// one period later; one-shot tasks are removed.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerHandle, K)> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due_ms <= until_ms)
            .min_by_key(|(_, task)| (task.due_ms, task.seq))
            .map(|(index, _)| index)?;

        let due_ms = self.tasks[index].due_ms;
        self.now_ms = self.now_ms.max(due_ms);

        let (handle, kind, period) = {
            let task = &self.tasks[index];
            (task.handle, task.kind, task.period_ms)
        };
        match period {
            Some(period_ms) => {
                let seq = self.bump_seq();
                let task = &mut self.tasks[index];
                task.due_ms = due_ms.saturating_add(period_ms);
                task.seq = seq;
            }
            None => {
                self.tasks.swap_remove(index);
            }
        }

        Some((handle, kind))
    }

    /// Move the clock forward to `until_ms` without firing anything.
    ///
    /// Call after draining [`pop_due`](Self::pop_due).
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Kind {
        A,
        B,
    }

    #[test]
    fn test_once_fires_once() {
        let mut sched = Scheduler::new();
        let h = sched.schedule_once(Kind::A, 500);
        assert_eq!(sched.due_at(h), Some(500));
        assert_eq!(sched.pop_due(1000), Some((h, Kind::A)));
        assert_eq!(sched.now_ms(), 500);
        assert_eq!(sched.pop_due(1000), None);
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn test_repeating_rearms() {
        let mut sched = Scheduler::new();
        let h = sched.schedule_repeating(Kind::A, 1000);
        let fired: Vec<_> = std::iter::from_fn(|| sched.pop_due(3500)).collect();
        assert_eq!(fired, vec![(h, Kind::A); 3]);
        assert_eq!(sched.now_ms(), 3000);
        assert_eq!(sched.due_at(h), Some(4000));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut sched = Scheduler::new();
        let h = sched.schedule_once(Kind::A, 10);
        assert!(sched.is_pending(h));
        assert!(sched.cancel(h));
        assert!(!sched.cancel(h));
        assert!(!sched.is_pending(h));
        assert_eq!(sched.pop_due(100), None);
    }

    #[test]
    fn test_ties_break_by_arming_order() {
        let mut sched = Scheduler::new();
        let a = sched.schedule_repeating(Kind::A, 1000);
        let b = sched.schedule_once(Kind::B, 1000);
        assert_eq!(sched.pop_due(1000), Some((a, Kind::A)));
        assert_eq!(sched.pop_due(1000), Some((b, Kind::B)));
    }

    #[test]
    fn test_cancel_from_dispatch_stops_repeating() {
        let mut sched = Scheduler::new();
        let h = sched.schedule_repeating(Kind::A, 1000);
        assert_eq!(sched.pop_due(1000), Some((h, Kind::A)));
        assert!(sched.cancel(h));
        assert_eq!(sched.pop_due(10_000), None);
    }

    #[test]
    fn test_delay_relative_to_now() {
        let mut sched = Scheduler::new();
        sched.settle(2500);
        let h = sched.schedule_once(Kind::B, 1000);
        assert_eq!(sched.due_at(h), Some(3500));
        // The clock never moves backwards.
        sched.settle(100);
        assert_eq!(sched.now_ms(), 2500);
    }
}
