//! ObrasLayer - public-works project datasets for map rendering
//!
//! This library loads heterogeneous GeoJSON datasets describing public-works
//! project units, repairs their coordinates, maps their inconsistent
//! property schemas into one typed [`mapper::ProjectUnit`], filters them and
//! resolves a render style for each feature.
//!
//! # High-Level API
//!
//! ```ignore
//! use obraslayer::filter::{apply_all, FilterSet};
//! use obraslayer::loader::{FileSource, ResourceCache};
//!
//! let cache = ResourceCache::new(FileSource::new("data"));
//! let snapshot = cache.load_all(&["equipamientos.geojson"]).await;
//!
//! let units: Vec<_> = snapshot.units().cloned().collect();
//! let visible = apply_all(&units, &FilterSet::new().with_estado("En Ejecución"));
//! ```

pub mod config;
pub mod coord;
pub mod feature;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod mapper;
pub mod symbology;

/// Version of the ObrasLayer library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
