//! Timers — what a fired timer means, and a queue hosts can schedule with.
//!
//! The core never sleeps. It asks the host to fire a [`TimerToken`] after a
//! delay and reacts when the host hands the token back. Two kinds exist:
//!
//! - **Dismiss** closes the popup that armed it. The token carries the
//!   popup's generation; a token from a popup that has since been replaced
//!   no longer matches and is ignored.
//! - **Refresh** is the debounced re-render after documents are added or
//!   removed. It carries a sequence number for the same reason: only the
//!   most recently scheduled refresh may run.
//!
//! [`TimerQueue`] is a virtual-clock scheduler for hosts that have no timer
//! facility of their own (the reference host and the tests). Time only moves
//! when the host says so, which keeps every firing deterministic.

use std::time::Duration;

use crate::host::TimerId;

/// Payload delivered back to the core when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerToken {
    /// Auto-close the popup rendered as `generation`.
    Dismiss { generation: u64 },
    /// Debounced popup refresh number `sequence` after a document was added
    /// or removed.
    Refresh { sequence: u64 },
}

// ---------------------------------------------------------------------------
// TimerQueue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Pending {
    id: TimerId,
    deadline: Duration,
    token: TimerToken,
}

/// Deterministic one-shot timer queue driven by a virtual clock.
///
/// Timers due at the same instant fire in scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

impl TimerQueue {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `token` to fire `delay` from now.
    pub fn schedule(&mut self, delay: Duration, token: TimerToken) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.push(Pending {
            id,
            deadline: self.now + delay,
            token,
        });
        id
    }

    /// Cancel a pending timer. Returns `false` if it already fired or never
    /// existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Whether `id` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline.
    ///
    /// Call in a loop to fire everything up to `until`; timers scheduled by
    /// the handlers in the meantime are picked up if they fall inside the
    /// window. Finish with [`advance_to`](Self::advance_to).
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, TimerToken)> {
        let (idx, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline <= until)
            .min_by_key(|(_, p)| (p.deadline, p.id))?;

        let fired = self.pending.remove(idx);
        self.now = self.now.max(fired.deadline);
        Some((fired.id, fired.token))
    }

    /// Move the clock forward to `until` without firing anything.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
