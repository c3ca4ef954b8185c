// src/restart/mod.rs

//! Process replacement.
//!
//! - [`identity`] captures how this process was started.
//! - [`exec`] provides the `ExecRestarter` used in production.
//!
//! The runtime talks to a [`Restarter`] rather than calling `exec` directly,
//! so tests can record restart attempts instead of losing the test process.

pub mod exec;
pub mod identity;

pub use exec::{build_command, resolve_executable, ExecRestarter};
pub use identity::ProcessIdentity;

use crate::errors::Result;

/// Trait abstracting how the next process generation is started.
pub trait Restarter: Send {
    /// Replace the current process with a new instance built from
    /// `identity`.
    ///
    /// A successful production restart never returns. An `Err` means the
    /// attempt was abandoned and the caller should keep watching.
    fn restart(&mut self, identity: &ProcessIdentity) -> Result<()>;
}
