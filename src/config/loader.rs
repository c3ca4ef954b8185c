use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, SupervisorConfig};
use crate::config::validate::validate_config;
use crate::errors::{RelaunchError, Result};
use crate::fs::FileSystem;
use crate::types::WatchSetPolicy;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`resolve`] for that.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs
        .read_to_string(path)
        .map_err(|e| RelaunchError::ConfigError(format!("reading config file {:?}: {e:#}", path)))?;

    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Layer CLI flags over values from the config file.
pub fn apply_cli_overrides(mut raw: RawConfigFile, args: &CliArgs) -> RawConfigFile {
    if let Some(dir) = &args.dir {
        raw.dir = Some(dir.clone());
    }
    if let Some(interval) = args.interval {
        raw.interval_secs = Some(interval);
    }
    if let Some(settle) = args.settle_ms {
        raw.settle_ms = Some(settle);
    }
    if !args.extensions.is_empty() {
        raw.extensions = Some(args.extensions.clone());
    }
    // Excludes accumulate: the file sets project-wide ignores, flags add more.
    raw.exclude.extend(args.exclude.iter().cloned());
    if args.prune {
        raw.watch_set = Some(WatchSetPolicy::Prune);
    }
    raw
}

/// Build the validated supervisor settings for this invocation.
///
/// - Reads `--config` if given.
/// - Applies CLI overrides.
/// - Checks the watch directory and the remaining invariants.
pub fn resolve(fs: &dyn FileSystem, args: &CliArgs) -> Result<SupervisorConfig> {
    let raw = match &args.config {
        Some(path) => load_from_path(fs, path)?,
        None => RawConfigFile::default(),
    };
    validate_config(fs, &apply_cli_overrides(raw, args))
}
