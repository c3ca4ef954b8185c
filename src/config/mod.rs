// src/config/mod.rs

//! Configuration loading and validation for relaunch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and resolved settings (`model.rs`).
//! - Load an optional config file and merge CLI flags over it (`loader.rs`).
//! - Validate the watch directory and other invariants (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{apply_cli_overrides, load_from_path, resolve};
pub use model::{RawConfigFile, SupervisorConfig};
pub use validate::validate_config;
