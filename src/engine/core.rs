// src/engine/core.rs

//! Pure core supervisor state machine.
//!
//! This module contains a synchronous, deterministic core that consumes
//! [`SupervisorEvent`]s (plus "the settle deadline passed") and produces a
//! [`CoreStep`] telling the IO shell what to do next.
//!
//! The async shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from the channel
//! - sleeping until the debounce deadline
//! - actually invoking the restarter
//!
//! Time is passed in explicitly so the core can be tested without Tokio.

use std::time::{Duration, Instant};

use tracing::info;

use crate::engine::debounce::Debouncer;
use crate::engine::dispatch::handle_change;
use crate::engine::SupervisorEvent;

/// Why the supervisor has to stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FatalCause {
    Notifier(String),
    Scan { path: std::path::PathBuf, reason: String },
}

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Replace the process image now.
    Restart,
    /// Stop with an error.
    Fail(FatalCause),
}

/// Decision returned by the core after handling one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn proceed() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }
}

/// Pure core state: just the debouncer.
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreSupervisor {
    debouncer: Debouncer,
}

impl CoreSupervisor {
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(settle_delay),
        }
    }

    /// When the shell should call [`CoreSupervisor::on_deadline`], if at all.
    pub fn restart_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Expose whether a restart is pending (for tests).
    pub fn restart_pending(&self) -> bool {
        self.debouncer.deadline().is_some()
    }

    /// Handle a single event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: SupervisorEvent, now: Instant) -> CoreStep {
        match event {
            SupervisorEvent::FileChanged(change) => {
                handle_change(&mut self.debouncer, &change, now);
                CoreStep::proceed()
            }
            SupervisorEvent::NotifierFailed(reason) => CoreStep {
                commands: vec![CoreCommand::Fail(FatalCause::Notifier(reason))],
                keep_running: false,
            },
            SupervisorEvent::ScanFailed { path, reason } => CoreStep {
                commands: vec![CoreCommand::Fail(FatalCause::Scan { path, reason })],
                keep_running: false,
            },
            SupervisorEvent::ShutdownRequested => {
                info!("shutdown requested, stopping supervisor");
                CoreStep {
                    commands: Vec::new(),
                    keep_running: false,
                }
            }
        }
    }

    /// The shell's timer fired; restart if the tree has been quiet long enough.
    pub fn on_deadline(&mut self, now: Instant) -> CoreStep {
        let mut step = CoreStep::proceed();
        if self.debouncer.take_due(now) {
            step.commands.push(CoreCommand::Restart);
        }
        step
    }
}
