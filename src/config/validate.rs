use std::path::PathBuf;
use std::time::Duration;

use globset::Glob;

use crate::config::model::{
    RawConfigFile, SupervisorConfig, DEFAULT_EXTENSION, DEFAULT_INTERVAL_SECS, DEFAULT_SETTLE_MS,
};
use crate::errors::{RelaunchError, Result};
use crate::fs::FileSystem;

/// Turn merged raw settings into a `SupervisorConfig`.
///
/// This checks:
/// - a watch directory was given, exists and is a directory
/// - the rescan interval is positive
/// - at least one non-empty extension remains
/// - every exclude glob compiles
///
/// The directory is validated once here and never re-checked.
pub fn validate_config(fs: &dyn FileSystem, raw: &RawConfigFile) -> Result<SupervisorConfig> {
    let root = validate_root(fs, raw.dir.as_deref())?;
    let rescan_interval = validate_interval(raw.interval_secs)?;
    let extensions = validate_extensions(raw.extensions.as_deref())?;
    validate_excludes(&raw.exclude)?;

    Ok(SupervisorConfig {
        root,
        rescan_interval,
        settle_delay: Duration::from_millis(raw.settle_ms.unwrap_or(DEFAULT_SETTLE_MS)),
        extensions,
        exclude: raw.exclude.clone(),
        watch_set: raw.watch_set.unwrap_or_default(),
    })
}

fn validate_root(fs: &dyn FileSystem, dir: Option<&str>) -> Result<PathBuf> {
    let dir = match dir {
        Some(d) if !d.trim().is_empty() => d,
        _ => {
            return Err(RelaunchError::ConfigError(
                "no directory to watch (pass --dir)".to_string(),
            ));
        }
    };

    let root = PathBuf::from(dir);
    if !fs.exists(&root) {
        return Err(RelaunchError::ConfigError(format!(
            "directory doesn't exist: {dir}"
        )));
    }
    if !fs.is_dir(&root) {
        return Err(RelaunchError::ConfigError(format!(
            "not a directory: {dir}"
        )));
    }
    Ok(root)
}

fn validate_interval(secs: Option<u64>) -> Result<Duration> {
    match secs.unwrap_or(DEFAULT_INTERVAL_SECS) {
        0 => Err(RelaunchError::ConfigError(
            "rescan interval must be >= 1 second (got 0)".to_string(),
        )),
        n => Ok(Duration::from_secs(n)),
    }
}

fn validate_extensions(exts: Option<&[String]>) -> Result<Vec<String>> {
    let Some(exts) = exts else {
        return Ok(vec![DEFAULT_EXTENSION.to_string()]);
    };

    let mut out = Vec::with_capacity(exts.len());
    for ext in exts {
        let ext = ext.trim().trim_start_matches('.');
        if ext.is_empty() {
            return Err(RelaunchError::ConfigError(
                "empty file extension in watch list".to_string(),
            ));
        }
        if !out.iter().any(|e| e == ext) {
            out.push(ext.to_string());
        }
    }

    if out.is_empty() {
        return Err(RelaunchError::ConfigError(
            "at least one file extension must be watched".to_string(),
        ));
    }
    Ok(out)
}

fn validate_excludes(patterns: &[String]) -> Result<()> {
    for pat in patterns {
        Glob::new(pat).map_err(|e| {
            RelaunchError::ConfigError(format!("invalid exclude glob {pat:?}: {e}"))
        })?;
    }
    Ok(())
}
