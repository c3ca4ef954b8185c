// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod restart;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::SupervisorConfig;
use crate::engine::{CoreSupervisor, Runtime, SupervisorEvent};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::restart::{ExecRestarter, ProcessIdentity, Restarter};
use crate::watch::{
    scan_blocking, spawn_rescanner, NotifyNotifier, RescanOptions, SourceMatcher, WatchSet,
};

/// High-level entry point used by `main.rs`.
///
/// Resolves configuration from the CLI (and optional config file) against
/// the real filesystem, then supervises with the exec-based restarter.
pub async fn run(args: CliArgs, identity: ProcessIdentity) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let cfg = config::resolve(fs.as_ref(), &args)?;
    supervise(cfg, identity, fs, ExecRestarter).await
}

/// Watch `cfg.root` and restart through `restarter` on changes.
///
/// This wires together:
/// - the `notify`-backed notifier and the initial scan
/// - the periodic rescanner
/// - Ctrl-C handling
/// - the runtime loop (dispatch, debounce, restart)
///
/// Returns `Ok(())` only after a shutdown request; walk and notifier
/// failures are returned as errors.
pub async fn supervise<R>(
    cfg: SupervisorConfig,
    identity: ProcessIdentity,
    fs: Arc<dyn FileSystem>,
    restarter: R,
) -> Result<()>
where
    R: Restarter,
{
    let root = fs.canonicalize(&cfg.root).unwrap_or_else(|_| cfg.root.clone());
    let matcher = Arc::new(SourceMatcher::from_config(&cfg)?);

    // Runtime event channel shared by notifier, rescanner and signal handler.
    let (rt_tx, rt_rx) = mpsc::channel::<SupervisorEvent>(64);

    let notifier = NotifyNotifier::new(rt_tx.clone())?;
    let mut watch_set = WatchSet::new(notifier, cfg.watch_set);

    // Initial scan happens before any event is dispatched.
    let found = scan_blocking(fs.clone(), root.clone(), matcher.clone()).await?;
    let report = watch_set.apply_scan(found)?;

    info!(">>> relaunch");
    info!(
        "Watching {} files in {}, CTRL+C to stop",
        describe_extensions(matcher.extensions()),
        root.display()
    );
    info!(
        files = report.total,
        interval_secs = cfg.rescan_interval.as_secs(),
        settle_ms = cfg.settle_delay.as_millis() as u64,
        policy = ?cfg.watch_set,
        "initial scan complete"
    );
    if report.total == 0 {
        warn!("no matching files found yet; new files are picked up on the next rescan");
    }

    let _rescanner = spawn_rescanner(
        watch_set,
        fs,
        matcher,
        RescanOptions {
            root,
            interval: cfg.rescan_interval,
        },
        rt_tx.clone(),
    );

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(SupervisorEvent::ShutdownRequested).await;
        });
    }
    drop(rt_tx);

    let core = CoreSupervisor::new(cfg.settle_delay);
    let runtime = Runtime::new(core, rt_rx, restarter, identity);
    runtime.run().await
}

fn describe_extensions(exts: &[String]) -> String {
    exts.iter()
        .map(|e| format!("\".{e}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_list_for_banner() {
        assert_eq!(describe_extensions(&["rs".to_string()]), "\".rs\"");
        assert_eq!(
            describe_extensions(&["rs".to_string(), "toml".to_string()]),
            "\".rs\", \".toml\""
        );
    }
}
