// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Deciding which files are source files (`patterns`).
//! - Walking the watch root (`scan`).
//! - Registering files with the OS notifier (`notifier`, `watch_set`).
//! - Re-walking the tree periodically so new files get picked up (`rescan`).
//!
//! It does **not** decide whether a change leads to a restart; it only turns
//! filesystem activity into `SupervisorEvent`s for the engine.

pub mod notifier;
pub mod path_utils;
pub mod patterns;
pub mod rescan;
pub mod scan;
pub mod watch_set;

pub use notifier::{Notifier, NotifyNotifier};
pub use patterns::SourceMatcher;
pub use rescan::{spawn_rescanner, RescanOptions};
pub use scan::{scan, scan_blocking};
pub use watch_set::{ScanReport, WatchSet};
