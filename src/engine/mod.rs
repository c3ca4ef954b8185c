// src/engine/mod.rs

//! Event-to-restart engine.
//!
//! This module ties together:
//! - classification of change events (`dispatch`)
//! - the restart debouncer (`debounce`)
//! - the main loop that reacts to:
//!   - file change events
//!   - notifier and rescan failures
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::path::PathBuf;

use crate::types::ChangeEvent;

/// Events flowing into the runtime from the notifier, rescanner and signal
/// handler. All producers share one channel so events are handled strictly
/// one at a time, in arrival order.
#[derive(Debug, Clone)]
pub enum SupervisorEvent {
    /// A watched path changed.
    FileChanged(ChangeEvent),
    /// The notifier reported an error; unrecoverable.
    NotifierFailed(String),
    /// A rescan (walk or registration) failed; unrecoverable.
    ScanFailed { path: PathBuf, reason: String },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod debounce;
pub mod dispatch;
pub mod runtime;

pub use self::core::{CoreCommand, CoreStep, CoreSupervisor, FatalCause};
pub use debounce::{DebounceState, Debouncer};
pub use dispatch::classify;
pub use runtime::Runtime;
