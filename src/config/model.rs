use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::WatchSetPolicy;

pub const DEFAULT_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_SETTLE_MS: u64 = 1000;
pub const DEFAULT_EXTENSION: &str = "rs";

/// Configuration as read from an optional TOML file.
///
/// ```toml
/// dir = "src"
/// interval_secs = 5
/// settle_ms = 1000
/// extensions = ["rs"]
/// exclude = ["target/**"]
/// watch_set = "add-only"
/// ```
///
/// Every key is optional; CLI flags override whatever is set here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub dir: Option<String>,

    #[serde(default)]
    pub interval_secs: Option<u64>,

    #[serde(default)]
    pub settle_ms: Option<u64>,

    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub watch_set: Option<WatchSetPolicy>,
}

/// Fully resolved supervisor settings.
///
/// Built once at startup from `RawConfigFile` + CLI overrides and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Root of the watched tree.
    pub root: PathBuf,
    /// Time between the end of one scan and the start of the next.
    pub rescan_interval: Duration,
    /// Quiet period after the last change before restarting.
    pub settle_delay: Duration,
    /// Extensions without the leading dot.
    pub extensions: Vec<String>,
    /// Exclude globs relative to `root`.
    pub exclude: Vec<String>,
    pub watch_set: WatchSetPolicy,
}

impl SupervisorConfig {
    /// Settings with defaults for everything but the root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            rescan_interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_MS),
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            exclude: Vec::new(),
            watch_set: WatchSetPolicy::default(),
        }
    }
}
