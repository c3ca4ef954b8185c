// src/watch/patterns.rs

use std::fmt;
use std::path::Path;

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::SupervisorConfig;
use crate::errors::Result;
use crate::watch::path_utils::file_extension;

/// Decides which files under the watch root are source files.
///
/// A file matches when its extension is one of the configured extensions and
/// its root-relative path (forward slashes, e.g. `"src/main.rs"`) is not
/// matched by any exclude glob.
#[derive(Clone)]
pub struct SourceMatcher {
    extensions: Vec<String>,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for SourceMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceMatcher")
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl SourceMatcher {
    pub fn new(extensions: &[String], exclude: &[String]) -> Result<Self> {
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude).context("building exclude globset")?)
        };

        Ok(Self {
            extensions: extensions.to_vec(),
            exclude_set,
        })
    }

    pub fn from_config(cfg: &SupervisorConfig) -> Result<Self> {
        Self::new(&cfg.extensions, &cfg.exclude)
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Returns true if the file at `rel_path` should be watched.
    pub fn matches(&self, rel_path: &str) -> bool {
        let ext_ok = file_extension(Path::new(rel_path))
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext));
        ext_ok && !self.is_excluded(rel_path)
    }

    /// Returns true if `rel_path` (file or directory) hits an exclude glob.
    ///
    /// The scanner does not descend into excluded directories.
    pub fn is_excluded(&self, rel_path: &str) -> bool {
        self.exclude_set
            .as_ref()
            .is_some_and(|set| set.is_match(rel_path))
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
