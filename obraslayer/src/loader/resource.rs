//! Parsed, mapped resources

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::error::LoadError;
use crate::feature::{CollectionError, FeatureCollection, SourceTag};
use crate::mapper::{map_collection, ProjectUnit};

/// A fetched resource after validation and mapping.
#[derive(Debug)]
pub struct ParsedResource {
    pub key: String,
    pub source: SourceTag,
    pub collection: Arc<FeatureCollection>,
    pub units: Arc<Vec<ProjectUnit>>,
    /// Features dropped because they failed to deserialize
    pub skipped: usize,
}

impl ParsedResource {
    /// Validates `bytes` as a feature collection and maps its features.
    pub fn parse(key: &str, bytes: &[u8]) -> Result<Self, LoadError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| LoadError::Json(format!("{}: {}", key, e)))?;

        let parsed = FeatureCollection::from_value(value).map_err(|e| match e {
            CollectionError::NotACollection(reason) => LoadError::Schema {
                key: key.to_string(),
                reason,
            },
            CollectionError::Json(reason) => LoadError::Json(format!("{}: {}", key, reason)),
        })?;

        if parsed.skipped > 0 {
            warn!(key, skipped = parsed.skipped, "Skipped malformed features");
        }

        let source = SourceTag::from_key(key);
        let units = map_collection(&parsed.collection, &source);
        let located = units.iter().filter(|u| u.has_coordinates()).count();

        debug!(
            key,
            source = %source,
            features = parsed.collection.len(),
            units = units.len(),
            located,
            "Parsed resource"
        );

        Ok(Self {
            key: key.to_string(),
            source,
            collection: Arc::new(parsed.collection),
            units: Arc::new(units),
            skipped: parsed.skipped,
        })
    }

    /// Units with a usable point coordinate.
    pub fn located_units(&self) -> impl Iterator<Item = &ProjectUnit> {
        self.units.iter().filter(|u| u.has_coordinates())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_maps_units() {
        let body = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature",
             "geometry": {"type": "Point", "coordinates": [3.41, -76.52]},
             "properties": {"upid": "UNP-1", "nickname": "Sede"}},
            {"type": "Feature", "geometry": null, "properties": {"upid": "UNP-2"}}
        ]}"#;

        let resource = ParsedResource::parse("equipamientos.geojson", body.as_bytes()).unwrap();
        assert_eq!(resource.source, SourceTag::Equipamientos);
        assert_eq!(resource.units.len(), 2);
        assert_eq!(resource.located_units().count(), 1);
        assert_eq!(resource.units[0].lng, Some(-76.52));
    }

    #[test]
    fn test_parse_rejects_non_collection() {
        let err = ParsedResource::parse("x.json", br#"{"type": "Feature"}"#).unwrap_err();
        assert!(matches!(err, LoadError::Schema { ref key, .. } if key == "x.json"));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = ParsedResource::parse("x.json", b"<html>").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }
}
