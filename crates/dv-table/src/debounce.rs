//! Trailing-edge debouncing of search input.
//!
//! Each keystroke replaces the pending text and pushes the deadline back. The
//! text is released once the quiet window has passed with no further input.
//! Time is passed in by the caller, so the debouncer never reads the clock.

use std::time::{Duration, Instant};

/// Quiet window used when none is configured.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
struct Pending {
    text: String,
    deadline: Instant,
}

/// Debounced search query.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<Pending>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl SearchDebouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a keystroke at `now`, cancelling any earlier pending text.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some(Pending {
            text: text.into(),
            deadline: now + self.delay,
        });
    }

    /// The pending text, if its quiet window has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.pending.as_ref()?.deadline <= now {
            self.pending.take().map(|p| p.text)
        } else {
            None
        }
    }

    /// The pending text regardless of the deadline.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|p| p.text)
    }

    /// Text waiting for its quiet window.
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.text.as_str())
    }

    /// Drop the pending text.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_releases_after_quiet_window() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::default();
        debouncer.input("e", start);
        assert_eq!(debouncer.poll(start + 299 * MS), None);
        assert_eq!(debouncer.poll(start + 300 * MS).as_deref(), Some("e"));
        assert_eq!(debouncer.poll(start + 900 * MS), None);
    }

    #[test]
    fn test_keystroke_resets_deadline() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::new(300 * MS);
        debouncer.input("e", start);
        debouncer.input("en", start + 200 * MS);
        debouncer.input("eng", start + 400 * MS);
        assert_eq!(debouncer.poll(start + 650 * MS), None);
        assert_eq!(debouncer.pending(), Some("eng"));
        assert_eq!(debouncer.poll(start + 700 * MS).as_deref(), Some("eng"));
    }

    #[test]
    fn test_flush_and_cancel() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::default();
        debouncer.input("pm", start);
        assert_eq!(debouncer.flush().as_deref(), Some("pm"));
        assert_eq!(debouncer.flush(), None);

        debouncer.input("x", start);
        debouncer.cancel();
        assert_eq!(debouncer.poll(start + 10 * DEFAULT_SEARCH_DEBOUNCE), None);
    }
}
