//! CLI command implementations.
//!
//! - [`cache`] - Resource cache diagnostics
//! - [`config`] - Configuration management (path, show, init)
//! - [`list`] - Filtered unit listing
//! - [`summary`] - Dataset overview

pub mod cache;
pub mod config;
pub mod list;
pub mod summary;
