use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use relaunch::errors::Result;
use relaunch::watch::Notifier;

/// A notifier that records registrations instead of talking to the OS.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    watched: Arc<Mutex<Vec<PathBuf>>>,
    unwatched: Arc<Mutex<Vec<PathBuf>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `watch` call, in order (duplicates included).
    pub fn watched(&self) -> Vec<PathBuf> {
        self.watched.lock().unwrap().clone()
    }

    pub fn unwatched(&self) -> Vec<PathBuf> {
        self.unwatched.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn watch(&mut self, path: &Path) -> Result<()> {
        self.watched.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn unwatch(&mut self, path: &Path) -> Result<()> {
        self.unwatched.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}
