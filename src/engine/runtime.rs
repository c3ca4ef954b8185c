// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::errors::{RelaunchError, Result};
use crate::restart::{ProcessIdentity, Restarter};

use super::core::{CoreCommand, CoreSupervisor, FatalCause};
use super::SupervisorEvent;

/// Drives the core supervisor in response to `SupervisorEvent`s and the
/// debounce timer, and delegates process replacement to a `Restarter`.
///
/// This is a pure IO shell around `CoreSupervisor`. Events are handled one
/// at a time; while a restart is being attempted nothing else is read.
pub struct Runtime<R: Restarter> {
    core: CoreSupervisor,
    event_rx: mpsc::Receiver<SupervisorEvent>,
    restarter: R,
    identity: ProcessIdentity,
}

impl<R: Restarter> fmt::Debug for Runtime<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl<R: Restarter> Runtime<R> {
    pub fn new(
        core: CoreSupervisor,
        event_rx: mpsc::Receiver<SupervisorEvent>,
        restarter: R,
        identity: ProcessIdentity,
    ) -> Self {
        Self {
            core,
            event_rx,
            restarter,
            identity,
        }
    }

    /// Main event loop.
    ///
    /// Returns `Ok(())` on shutdown request or when every producer is gone,
    /// and an error for notifier/scan failures.
    pub async fn run(mut self) -> Result<()> {
        info!("relaunch runtime started");

        loop {
            let deadline = self.core.restart_deadline();

            let step = tokio::select! {
                received = self.event_rx.recv() => match received {
                    Some(event) => {
                        debug!(?event, "runtime received event");
                        self.core.step(event, Instant::now().into_std())
                    }
                    None => {
                        info!("runtime event channel closed; exiting");
                        break;
                    }
                },
                _ = sleep_until_deadline(deadline), if deadline.is_some() => {
                    self.core.on_deadline(Instant::now().into_std())
                }
            };

            for command in step.commands {
                self.execute_command(command)?;
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        info!("runtime exiting");
        Ok(())
    }

    fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::Restart => {
                self.attempt_restart();
                Ok(())
            }
            CoreCommand::Fail(FatalCause::Notifier(reason)) => {
                error!(%reason, "notifier failed");
                Err(RelaunchError::NotifierError(reason))
            }
            CoreCommand::Fail(FatalCause::Scan { path, reason }) => {
                error!(?path, %reason, "rescan failed");
                Err(RelaunchError::WalkError {
                    path,
                    source: anyhow::anyhow!(reason),
                })
            }
        }
    }

    fn attempt_restart(&mut self) {
        info!(exe = ?self.identity.exe(), "restarting");
        match self.restarter.restart(&self.identity) {
            Ok(()) => debug!("restarter returned without replacing the process"),
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "restart failed; still watching");
            }
            Err(err) => error!(error = %err, "restart failed; still watching"),
        }
    }
}

async fn sleep_until_deadline(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(d) => tokio::time::sleep_until(Instant::from_std(d)).await,
        None => std::future::pending::<()>().await,
    }
}
