// src/watch/notifier.rs

use std::path::Path;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::SupervisorEvent;
use crate::errors::Result;
use crate::types::{ChangeEvent, ChangeOps};

/// Registration side of the OS change-notification service.
///
/// Events for registered paths are delivered out of band (see
/// [`NotifyNotifier::new`]); this trait only covers subscribing and
/// unsubscribing, which is all the watch set needs.
pub trait Notifier: Send {
    /// Start receiving events for a single file.
    fn watch(&mut self, path: &Path) -> Result<()>;

    /// Stop receiving events for a single file.
    fn unwatch(&mut self, path: &Path) -> Result<()>;
}

/// `notify`-backed notifier used in production.
///
/// Each file is registered non-recursively on its own; directories are never
/// registered. Dropping this value stops all notifications.
pub struct NotifyNotifier {
    inner: RecommendedWatcher,
}

impl std::fmt::Debug for NotifyNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyNotifier").finish()
    }
}

impl NotifyNotifier {
    /// Create the OS watcher and a task that forwards its output, in order,
    /// into `runtime_tx` as `FileChanged` / `NotifierFailed` events.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(runtime_tx: mpsc::Sender<SupervisorEvent>) -> Result<Self> {
        // Channel from the blocking notify callback into the async world.
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

        let inner = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                if let Err(err) = event_tx.send(res) {
                    // Runs on the notify thread, outside any tracing span.
                    eprintln!("relaunch: failed to forward notify event: {err}");
                }
            },
            Config::default(),
        )?;

        tokio::spawn(async move {
            while let Some(res) = event_rx.recv().await {
                for event in translate(res) {
                    if runtime_tx.send(event).await.is_err() {
                        debug!("runtime channel closed; stopping notifier forwarder");
                        return;
                    }
                }
            }
            debug!("notifier forwarder finished");
        });

        Ok(Self { inner })
    }
}

impl Notifier for NotifyNotifier {
    fn watch(&mut self, path: &Path) -> Result<()> {
        self.inner.watch(path, RecursiveMode::NonRecursive)?;
        Ok(())
    }

    fn unwatch(&mut self, path: &Path) -> Result<()> {
        self.inner.unwatch(path)?;
        Ok(())
    }
}

/// Turn one `notify` callback result into runtime events (one per path).
pub fn translate(res: notify::Result<Event>) -> Vec<SupervisorEvent> {
    match res {
        Ok(event) => {
            let ops = ChangeOps::from_event_kind(&event.kind);
            event
                .paths
                .into_iter()
                .map(|path| SupervisorEvent::FileChanged(ChangeEvent::new(path, ops)))
                .collect()
        }
        Err(err) => {
            warn!(error = %err, "file watch error");
            vec![SupervisorEvent::NotifierFailed(err.to_string())]
        }
    }
}
