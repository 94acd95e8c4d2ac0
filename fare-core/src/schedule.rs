//! Trailing-edge debounce for recomputes.
//!
//! A [`DebounceSlot`] holds at most one pending deadline. Every trigger
//! replaces it, so a burst of input changes collapses into a single
//! recompute that fires `delay` after the last change.
//!
//! The slot does no waiting itself. An event loop asks it for the pending
//! deadline, sleeps until then (or until the next input arrives), and calls
//! [`DebounceSlot::fire_if_due`].

use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tracing::trace;

/// Single pending-timer slot with latest-wins semantics.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tokio::time::Instant;
/// use fare_core::DebounceSlot;
///
/// let mut slot = DebounceSlot::new(Duration::from_millis(300));
/// let start = Instant::now();
///
/// slot.trigger(start);
/// slot.trigger(start + Duration::from_millis(200));
///
/// assert!(!slot.fire_if_due(start + Duration::from_millis(300)));
/// assert!(slot.fire_if_due(start + Duration::from_millis(500)));
/// assert!(!slot.fire_if_due(start + Duration::from_millis(900)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceSlot {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceSlot {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The instant the pending recompute fires, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Schedules a recompute `delay` after `now`, superseding any pending one.
    pub fn trigger(
        &mut self,
        now: Instant,
    ) {
        let deadline = now + self.delay;
        trace!(delay = ?self.delay, "recompute scheduled");
        self.deadline = Some(deadline);
    }

    /// Returns true, once, when the pending deadline has been reached.
    pub fn fire_if_due(
        &mut self,
        now: Instant,
    ) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drops the pending recompute, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Waits until the pending deadline. Never completes while nothing is
    /// pending, so it can sit in a `tokio::select!` next to input sources.
    pub async fn expired(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}
