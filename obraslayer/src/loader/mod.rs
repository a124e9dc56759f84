//! Fetching, parsing and caching of datasets.
//!
//! [`ResourceCache`] deduplicates concurrent loads of the same key, turns
//! each payload into a [`ParsedResource`] (raw collection plus mapped
//! units) and publishes aggregate snapshots to subscribed listeners.
//! Bytes come from a [`ResourceSource`]: [`HttpSource`] for a remote base
//! URL or [`FileSource`] for a local directory.

mod cache;
mod config;
mod error;
mod resource;
mod snapshot;
mod source;
mod stats;

pub use cache::{LoadOutcome, ResourceCache};
pub use config::{LoaderConfig, DEFAULT_LOAD_TIMEOUT_SECS};
pub use error::{LoadError, SourceError};
pub use resource::ParsedResource;
pub use snapshot::{AggregateSnapshot, ListenerId};
pub use source::{AnySource, FileSource, HttpSource, ResourceSource};
pub use stats::LoaderStats;

#[cfg(test)]
mod tests;
