use std::sync::{Arc, Mutex};
use std::time::Instant;

use relaunch::errors::{RelaunchError, Result};
use relaunch::restart::{ProcessIdentity, Restarter};

/// What the fake does when asked to restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartOutcome {
    /// Pretend the hand-off worked (returns `Ok`).
    Succeed,
    /// Fail as if the executable could not be found.
    FailResolve,
    /// Fail as if `exec` itself was refused.
    FailExec,
}

/// One recorded restart attempt.
#[derive(Debug, Clone)]
pub struct RestartAttempt {
    pub identity: ProcessIdentity,
    pub at: Instant,
}

/// A restarter that records every attempt instead of replacing the process.
///
/// Clones share the same log, so tests keep one handle and pass another to
/// the runtime.
#[derive(Debug, Clone)]
pub struct RecordingRestarter {
    outcome: Arc<Mutex<RestartOutcome>>,
    attempts: Arc<Mutex<Vec<RestartAttempt>>>,
}

impl RecordingRestarter {
    pub fn new(outcome: RestartOutcome) -> Self {
        Self {
            outcome: Arc::new(Mutex::new(outcome)),
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_outcome(&self, outcome: RestartOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn attempts(&self) -> Vec<RestartAttempt> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }
}

impl Default for RecordingRestarter {
    fn default() -> Self {
        Self::new(RestartOutcome::Succeed)
    }
}

impl Restarter for RecordingRestarter {
    fn restart(&mut self, identity: &ProcessIdentity) -> Result<()> {
        self.attempts.lock().unwrap().push(RestartAttempt {
            identity: identity.clone(),
            at: Instant::now(),
        });

        match *self.outcome.lock().unwrap() {
            RestartOutcome::Succeed => Ok(()),
            RestartOutcome::FailResolve => Err(RelaunchError::ResolveError {
                path: identity.exe().to_path_buf(),
                reason: "cannot find binary path".to_string(),
            }),
            RestartOutcome::FailExec => Err(RelaunchError::ExecError {
                path: identity.exe().to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            }),
        }
    }
}
