//! Transient status line with race-free expiry.
//!
//! The tool this replaces reverted status messages from a fire-and-forget
//! background task that compared a shared timestamp, so an old timer could
//! clear a newer message. Here every message carries a monotonic generation
//! and its own deadline; expiry happens on the event loop's timer tick and
//! only ever clears the generation it observed.

use std::time::{Duration, Instant};

/// How long a status message stays up before reverting to the hint bar.
pub const STATUS_TTL: Duration = Duration::from_secs(5);

/// Visual class of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Neutral notices.
    Info,
    /// Completed exports, loaded pages.
    Success,
    /// Reportable failures (iterator, lookup, filesystem).
    Error,
}

/// One-line advisory status with a deadline.
#[derive(Debug, Clone)]
pub struct StatusLine {
    message: Option<(StatusKind, String)>,
    deadline: Option<Instant>,
    generation: u64,
}

impl StatusLine {
    /// Empty status line.
    pub fn new() -> Self {
        Self {
            message: None,
            deadline: None,
            generation: 0,
        }
    }

    /// Replace the current message; bumps the generation so any deadline
    /// observed for an older message can no longer clear this one.
    pub fn set(&mut self, kind: StatusKind, message: impl Into<String>, now: Instant) {
        self.generation += 1;
        self.message = Some((kind, message.into()));
        self.deadline = Some(now + STATUS_TTL);
    }

    /// Expire the message if its deadline has passed. Returns `true` when
    /// the line changed (caller should redraw).
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.message = None;
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Current message, if one is up.
    pub fn current(&self) -> Option<(StatusKind, &str)> {
        self.message
            .as_ref()
            .map(|(kind, text)| (*kind, text.as_str()))
    }

    /// Monotonic message counter, bumped on every `set`.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_current_round_trips() {
        let now = Instant::now();
        let mut status = StatusLine::new();
        status.set(StatusKind::Success, "Dumped 3 keys", now);
        assert_eq!(status.current(), Some((StatusKind::Success, "Dumped 3 keys")));
    }

    #[test]
    fn tick_before_deadline_keeps_message() {
        let now = Instant::now();
        let mut status = StatusLine::new();
        status.set(StatusKind::Info, "hello", now);
        assert!(!status.tick(now + Duration::from_secs(1)));
        assert!(status.current().is_some());
    }

    #[test]
    fn tick_after_deadline_clears_message() {
        let now = Instant::now();
        let mut status = StatusLine::new();
        status.set(StatusKind::Info, "hello", now);
        assert!(status.tick(now + STATUS_TTL));
        assert!(status.current().is_none());
        // A second tick is a no-op.
        assert!(!status.tick(now + STATUS_TTL));
    }

    #[test]
    fn newer_message_extends_the_deadline() {
        let now = Instant::now();
        let mut status = StatusLine::new();
        status.set(StatusKind::Info, "old", now);
        let later = now + Duration::from_secs(4);
        status.set(StatusKind::Error, "new", later);

        // The old message's deadline passes; the new one must survive.
        assert!(!status.tick(now + STATUS_TTL));
        assert_eq!(status.current(), Some((StatusKind::Error, "new")));

        assert!(status.tick(later + STATUS_TTL));
        assert!(status.current().is_none());
    }

    #[test]
    fn generation_is_monotonic() {
        let now = Instant::now();
        let mut status = StatusLine::new();
        let g0 = status.generation();
        status.set(StatusKind::Info, "a", now);
        status.set(StatusKind::Info, "b", now);
        assert!(status.generation() > g0 + 1);
    }
}
