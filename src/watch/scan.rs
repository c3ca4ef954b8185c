// src/watch/scan.rs

//! Recursive directory walk that finds the files to watch.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::errors::{RelaunchError, Result};
use crate::fs::{EntryKind, FileSystem};
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::SourceMatcher;

/// Walk `root` and collect every regular file accepted by `matcher`.
///
/// - Directories are descended into but never returned.
/// - Symlinks and other special entries are neither followed nor returned.
/// - Excluded directories are skipped entirely.
///
/// Any error (permission denied, an entry vanishing mid-walk) aborts the
/// whole scan: a partial result is never returned.
pub fn scan(fs: &dyn FileSystem, root: &Path, matcher: &SourceMatcher) -> Result<BTreeSet<PathBuf>> {
    let mut found = BTreeSet::new();

    match fs.entry_kind(root).map_err(|e| walk_error(root, e))? {
        EntryKind::Dir => {}
        _ => {
            return Err(walk_error(
                root,
                anyhow::anyhow!("watch root is not a directory"),
            ));
        }
    }

    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let mut children = fs.read_dir(&dir).map_err(|e| walk_error(&dir, e))?;
        children.sort();

        for child in children {
            let kind = fs.entry_kind(&child).map_err(|e| walk_error(&child, e))?;
            let rel = relative_str(root, &child).unwrap_or_default();

            match kind {
                EntryKind::Dir => {
                    if matcher.is_excluded(&rel) {
                        trace!(dir = %rel, "skipping excluded directory");
                    } else {
                        stack.push(child);
                    }
                }
                EntryKind::File => {
                    if matcher.matches(&rel) {
                        found.insert(child);
                    }
                }
                EntryKind::Other => {
                    trace!(path = %rel, "skipping non-regular entry");
                }
            }
        }
    }

    debug!(root = ?root, files = found.len(), "scan complete");
    Ok(found)
}

/// Run [`scan`] on the blocking thread pool.
pub async fn scan_blocking(
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    matcher: Arc<SourceMatcher>,
) -> Result<BTreeSet<PathBuf>> {
    let join_root = root.clone();
    tokio::task::spawn_blocking(move || scan(fs.as_ref(), &root, &matcher))
        .await
        .map_err(|e| walk_error(&join_root, anyhow::anyhow!("scan task failed: {e}")))?
}

fn walk_error(path: &Path, source: anyhow::Error) -> RelaunchError {
    RelaunchError::WalkError {
        path: path.to_path_buf(),
        source,
    }
}
