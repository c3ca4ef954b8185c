use std::fmt;
use std::path::PathBuf;

use notify::EventKind;
use notify::event::{ModifyKind, RenameMode};
use serde::Deserialize;

/// Operation bits carried by a single change event.
///
/// One notification may carry several bits at once (e.g. a write that also
/// touched permissions), so this is a small bit set rather than an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ChangeOps(u8);

impl ChangeOps {
    pub const WRITE: ChangeOps = ChangeOps(1);
    pub const CREATE: ChangeOps = ChangeOps(1 << 1);
    pub const REMOVE: ChangeOps = ChangeOps(1 << 2);
    pub const RENAME: ChangeOps = ChangeOps(1 << 3);
    pub const CHMOD: ChangeOps = ChangeOps(1 << 4);

    pub const fn empty() -> Self {
        ChangeOps(0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: ChangeOps) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub const fn union(self, other: ChangeOps) -> Self {
        ChangeOps(self.0 | other.0)
    }

    /// Map a `notify` event kind onto operation bits.
    ///
    /// Access notifications and unknown kinds map to the empty set.
    pub fn from_event_kind(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => ChangeOps::CREATE,
            EventKind::Remove(_) => ChangeOps::REMOVE,
            EventKind::Modify(ModifyKind::Metadata(_)) => ChangeOps::CHMOD,
            // A file moved into a watched location looks like a creation.
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => ChangeOps::CREATE,
            EventKind::Modify(ModifyKind::Name(_)) => ChangeOps::RENAME,
            EventKind::Modify(_) => ChangeOps::WRITE,
            EventKind::Access(_) | EventKind::Any | EventKind::Other => ChangeOps::empty(),
        }
    }
}

impl std::ops::BitOr for ChangeOps {
    type Output = ChangeOps;

    fn bitor(self, rhs: ChangeOps) -> ChangeOps {
        self.union(rhs)
    }
}

impl fmt::Display for ChangeOps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (ChangeOps::CREATE, "CREATE"),
            (ChangeOps::WRITE, "WRITE"),
            (ChangeOps::REMOVE, "REMOVE"),
            (ChangeOps::RENAME, "RENAME"),
            (ChangeOps::CHMOD, "CHMOD"),
        ];

        let mut first = true;
        for (bit, name) in names {
            if self.contains(bit) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("NONE")?;
        }
        Ok(())
    }
}

/// A single filesystem notification for a watched path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub ops: ChangeOps,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, ops: ChangeOps) -> Self {
        Self {
            path: path.into(),
            ops,
        }
    }
}

/// Classified kind of a change event, in dispatch priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Write,
    Create,
    Remove,
    Rename,
    Chmod,
}

impl ChangeKind {
    /// Whether an event of this kind should lead to a restart.
    pub fn triggers_restart(self) -> bool {
        !matches!(self, ChangeKind::Chmod)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeKind::Write => "Write",
            ChangeKind::Create => "Create",
            ChangeKind::Remove => "Remove",
            ChangeKind::Rename => "Rename",
            ChangeKind::Chmod => "Chmod",
        };
        f.write_str(s)
    }
}

/// How the watch set reacts to files that disappear between scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatchSetPolicy {
    /// Registrations only ever grow; stale paths simply stop producing events.
    #[default]
    AddOnly,
    /// Paths missing from the latest scan are unregistered.
    Prune,
}
