// src/watch/watch_set.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::WatchSetPolicy;
use crate::watch::notifier::Notifier;
use crate::watch::patterns::SourceMatcher;
use crate::watch::scan::scan;

/// What a single scan changed in the watch set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    /// Registered paths after the scan.
    pub total: usize,
}

/// The set of paths currently registered with the notifier.
///
/// The watch set is the only thing that talks to the notifier's registration
/// API. Each scan hands every found path to the notifier again, which
/// replaces any existing watch; `registered` tracks what has been reported.
/// With [`WatchSetPolicy::AddOnly`] it only ever grows; with
/// [`WatchSetPolicy::Prune`] each scan result is diffed against the previous
/// registrations.
#[derive(Debug)]
pub struct WatchSet<N: Notifier> {
    notifier: N,
    policy: WatchSetPolicy,
    registered: BTreeSet<PathBuf>,
}

impl<N: Notifier> WatchSet<N> {
    pub fn new(notifier: N, policy: WatchSetPolicy) -> Self {
        Self {
            notifier,
            policy,
            registered: BTreeSet::new(),
        }
    }

    pub fn policy(&self) -> WatchSetPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.registered.contains(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.registered.iter().map(PathBuf::as_path)
    }

    /// Walk `root` and register every newly found source file.
    pub fn populate(
        &mut self,
        fs: &dyn FileSystem,
        root: &Path,
        matcher: &SourceMatcher,
    ) -> Result<ScanReport> {
        let found = scan(fs, root, matcher)?;
        self.apply_scan(found)
    }

    /// Reconcile registrations with the files found by one scan.
    ///
    /// `added` lists only paths seen for the first time.
    ///
    /// Registration failures are returned as errors; unregistration failures
    /// are only logged since the notifier usually drops watches on deleted
    /// files by itself.
    pub fn apply_scan(&mut self, found: BTreeSet<PathBuf>) -> Result<ScanReport> {
        let mut report = ScanReport::default();

        // Re-register every found path, not only new ones: a file replaced by
        // rename (atomic save) loses its OS watch while keeping its path.
        for path in &found {
            self.notifier.watch(path)?;
            if self.registered.insert(path.clone()) {
                debug!(path = ?path, "watching file");
                report.added.push(path.clone());
            }
        }

        if self.policy == WatchSetPolicy::Prune {
            let stale: Vec<PathBuf> = self.registered.difference(&found).cloned().collect();
            for path in stale {
                if let Err(err) = self.notifier.unwatch(&path) {
                    warn!(path = ?path, error = %err, "failed to unwatch stale path");
                }
                debug!(path = ?path, "stopped watching file");
                self.registered.remove(&path);
                report.removed.push(path);
            }
        }

        report.total = self.registered.len();
        Ok(report)
    }
}
