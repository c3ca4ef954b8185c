// src/engine/dispatch.rs

//! Classification of change events.

use std::time::Instant;

use tracing::{debug, info};

use crate::engine::debounce::Debouncer;
use crate::types::{ChangeEvent, ChangeKind, ChangeOps};

/// Pick the kind an event is handled as.
///
/// An event may carry several operation bits; the first match in the order
/// write, create, remove, rename, chmod wins. Returns `None` when no known
/// bit is set.
pub fn classify(ops: ChangeOps) -> Option<ChangeKind> {
    const ORDER: [(ChangeOps, ChangeKind); 5] = [
        (ChangeOps::WRITE, ChangeKind::Write),
        (ChangeOps::CREATE, ChangeKind::Create),
        (ChangeOps::REMOVE, ChangeKind::Remove),
        (ChangeOps::RENAME, ChangeKind::Rename),
        (ChangeOps::CHMOD, ChangeKind::Chmod),
    ];

    ORDER
        .iter()
        .find(|(bit, _)| ops.contains(*bit))
        .map(|(_, kind)| *kind)
}

/// Log a change event and, unless it is permission-only, request a restart.
///
/// Returns the kind the event was classified as.
pub fn handle_change(
    debouncer: &mut Debouncer,
    event: &ChangeEvent,
    now: Instant,
) -> Option<ChangeKind> {
    let Some(kind) = classify(event.ops) else {
        debug!(path = ?event.path, ops = %event.ops, "ignoring event without relevant ops");
        return None;
    };

    info!("{}: {}: {}", kind, event.ops, event.path.display());

    if kind.triggers_restart() {
        let deadline = debouncer.trigger(now);
        debug!(
            kind = %kind,
            in_ms = deadline.saturating_duration_since(now).as_millis() as u64,
            "restart scheduled"
        );
    }

    Some(kind)
}
