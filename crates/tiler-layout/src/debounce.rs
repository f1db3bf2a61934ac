// ABOUTME: Trailing-edge debouncer for container resize notifications.
// ABOUTME: Holds at most one pending task; scheduling always replaces it.

use std::time::{Duration, Instant};

use crate::geometry::Size;

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingResize {
    container: Size,
    due: Instant,
}

/// Coalesces a burst of resize notifications into the last one.
///
/// The caller supplies the clock, so the event loop decides when to poll
/// (for instance by waking at [`ResizeDebouncer::deadline`]).
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    quiet: Duration,
    pending: Option<PendingResize>,
}

impl ResizeDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Schedule a resize to `container`, cancelling any pending one.
    /// Returns true when a pending resize was replaced.
    pub fn schedule(&mut self, container: Size, now: Instant) -> bool {
        let replaced = self.pending.is_some();
        self.pending = Some(PendingResize {
            container,
            due: now + self.quiet,
        });
        replaced
    }

    /// Take the pending resize once its quiet window has passed
    pub fn poll(&mut self, now: Instant) -> Option<Size> {
        match self.pending {
            Some(pending) if now >= pending.due => {
                self.pending = None;
                Some(pending.container)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) -> Option<Size> {
        self.pending.take().map(|p| p.container)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }
}
