// src/engine/debounce.rs

//! Restart debouncing.
//!
//! A burst of related filesystem events (truncate + write + chmod from one
//! editor save) should cause one restart, after the tree has gone quiet.
//!
//! ```text
//! Idle --trigger(now)--> Pending(now + settle)
//! Pending --trigger(now)--> Pending(now + settle)
//! Pending --take_due(now >= deadline)--> Idle   (caller restarts)
//! ```

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending { deadline: Instant },
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    settle: Duration,
    state: DebounceState,
}

impl Debouncer {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            state: DebounceState::Idle,
        }
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::Idle => None,
            DebounceState::Pending { deadline } => Some(deadline),
        }
    }

    /// Record a restart request; returns the (possibly pushed back) deadline.
    pub fn trigger(&mut self, now: Instant) -> Instant {
        let deadline = now + self.settle;
        self.state = DebounceState::Pending { deadline };
        deadline
    }

    /// If a restart is due at `now`, return to `Idle` and report `true`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.state {
            DebounceState::Pending { deadline } if now >= deadline => {
                self.state = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }
}
