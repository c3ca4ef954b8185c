// src/watch/rescan.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::engine::SupervisorEvent;
use crate::errors::RelaunchError;
use crate::fs::FileSystem;
use crate::watch::notifier::Notifier;
use crate::watch::patterns::SourceMatcher;
use crate::watch::scan::scan_blocking;
use crate::watch::watch_set::WatchSet;

/// Inputs for the periodic rescan task.
#[derive(Debug, Clone)]
pub struct RescanOptions {
    pub root: PathBuf,
    pub interval: Duration,
}

/// Spawn the task that keeps the watch set current.
///
/// The caller is expected to have done the initial scan already. The task
/// sleeps for `interval`, scans, applies the result, and only then arms the
/// next sleep, so scans never overlap. Any scan or registration failure is
/// sent to the runtime as `ScanFailed` and ends the task.
pub fn spawn_rescanner<N>(
    mut watch_set: WatchSet<N>,
    fs: Arc<dyn FileSystem>,
    matcher: Arc<SourceMatcher>,
    options: RescanOptions,
    runtime_tx: mpsc::Sender<SupervisorEvent>,
) -> JoinHandle<()>
where
    N: Notifier + 'static,
{
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(options.interval).await;

            let result = match scan_blocking(fs.clone(), options.root.clone(), matcher.clone()).await
            {
                Ok(found) => watch_set.apply_scan(found),
                Err(err) => Err(err),
            };

            match result {
                Ok(report) => {
                    if report.added.is_empty() && report.removed.is_empty() {
                        debug!(total = report.total, "rescan found no changes");
                    } else {
                        info!(
                            added = report.added.len(),
                            removed = report.removed.len(),
                            total = report.total,
                            "watch set updated"
                        );
                    }
                }
                Err(err) => {
                    error!(error = %err, "rescan failed");
                    let event = scan_failure(&options.root, err);
                    if runtime_tx.send(event).await.is_err() {
                        debug!("runtime channel closed before scan failure was delivered");
                    }
                    return;
                }
            }
        }
    })
}

fn scan_failure(root: &std::path::Path, err: RelaunchError) -> SupervisorEvent {
    match err {
        RelaunchError::WalkError { path, source } => SupervisorEvent::ScanFailed {
            path,
            reason: format!("{source:#}"),
        },
        other => SupervisorEvent::ScanFailed {
            path: root.to_path_buf(),
            reason: other.to_string(),
        },
    }
}
