use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use relaunch::config::SupervisorConfig;
use relaunch::restart::ProcessIdentity;
use relaunch::types::{ChangeEvent, ChangeOps, WatchSetPolicy};

/// Builder for `ProcessIdentity` to simplify test setup.
pub struct IdentityBuilder {
    exe: PathBuf,
    args: Vec<OsString>,
    env: Vec<(OsString, OsString)>,
}

impl IdentityBuilder {
    pub fn new(exe: &str) -> Self {
        Self {
            exe: PathBuf::from(exe),
            args: vec![OsString::from(exe)],
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.args.push(OsString::from(arg));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((OsString::from(key), OsString::from(value)));
        self
    }

    pub fn build(self) -> ProcessIdentity {
        ProcessIdentity::new(self.exe, self.args, self.env)
    }
}

/// Builder for `SupervisorConfig` with test-friendly (short) timings.
pub struct SupervisorConfigBuilder {
    config: SupervisorConfig,
}

impl SupervisorConfigBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut config = SupervisorConfig::with_root(root);
        config.rescan_interval = Duration::from_millis(50);
        config.settle_delay = Duration::from_millis(50);
        Self { config }
    }

    pub fn rescan_interval(mut self, interval: Duration) -> Self {
        self.config.rescan_interval = interval;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    pub fn extension(mut self, ext: &str) -> Self {
        self.config.extensions.push(ext.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.config.exclude.push(pattern.to_string());
        self
    }

    pub fn prune(mut self) -> Self {
        self.config.watch_set = WatchSetPolicy::Prune;
        self
    }

    pub fn build(self) -> SupervisorConfig {
        self.config
    }
}

/// Shorthand for a change event.
pub fn change(path: &str, ops: ChangeOps) -> ChangeEvent {
    ChangeEvent::new(path, ops)
}
