// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelaunchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Walk error at {path:?}: {source}")]
    WalkError {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Notifier error: {0}")]
    NotifierError(String),

    #[error("Could not resolve executable {path:?}: {reason}")]
    ResolveError { path: PathBuf, reason: String },

    #[error("Could not replace process image with {path:?}: {source}")]
    ExecError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RelaunchError {
    /// Restart failures are retried by the next change event; everything
    /// else ends the process.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RelaunchError::ResolveError { .. } | RelaunchError::ExecError { .. }
        )
    }
}

impl From<notify::Error> for RelaunchError {
    fn from(err: notify::Error) -> Self {
        RelaunchError::NotifierError(err.to_string())
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RelaunchError>;
