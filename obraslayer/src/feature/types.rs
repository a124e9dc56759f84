//! Feature collection types and parsing

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// Errors raised while parsing a feature collection payload.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CollectionError {
    /// Payload is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(String),

    /// Payload is JSON but not a feature collection
    #[error("not a feature collection: {0}")]
    NotACollection(String),
}

/// Geometry type tag as found in the `type` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

/// Geometry of a raw feature.
///
/// Coordinates are kept as received so the rendering layer gets exactly
/// what the origin served; repair only ever happens on a copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: GeometryKind,
    #[serde(default)]
    pub coordinates: Value,
}

impl Geometry {
    /// Creates a geometry from a kind and raw coordinates.
    pub fn new(kind: GeometryKind, coordinates: Value) -> Self {
        Self { kind, coordinates }
    }

    /// Returns true for `Point` geometries.
    pub fn is_point(&self) -> bool {
        self.kind == GeometryKind::Point
    }
}

/// One geometry + property-bag record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Value>,
}

impl RawFeature {
    /// Creates a feature from a geometry and properties.
    pub fn new(geometry: Option<Geometry>, properties: Map<String, Value>) -> Self {
        Self {
            id: None,
            geometry,
            properties,
        }
    }

    /// Looks up a property by key.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Returns the top-level feature id rendered as text.
    pub fn id_text(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// A container of raw features.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<RawFeature>,
}

/// Result of parsing a payload: the collection plus the number of records
/// that were dropped because they were not valid features.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCollection {
    pub collection: FeatureCollection,
    pub skipped: usize,
}

impl FeatureCollection {
    /// Creates a collection from features.
    pub fn new(features: Vec<RawFeature>) -> Self {
        Self { features }
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true if the collection holds no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Parses a payload into a feature collection.
    ///
    /// The payload must be a JSON object with a `features` array. Records in
    /// that array that do not deserialize as features are skipped and
    /// counted rather than failing the whole payload.
    pub fn from_slice(bytes: &[u8]) -> Result<ParsedCollection, CollectionError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| CollectionError::Json(e.to_string()))?;
        Self::from_value(value)
    }

    /// Same as [`FeatureCollection::from_slice`] for an already-parsed value.
    pub fn from_value(value: Value) -> Result<ParsedCollection, CollectionError> {
        let Value::Object(mut root) = value else {
            return Err(CollectionError::NotACollection(
                "payload is not a JSON object".to_string(),
            ));
        };

        let records = match root.remove("features") {
            Some(Value::Array(records)) => records,
            Some(_) => {
                return Err(CollectionError::NotACollection(
                    "`features` is not an array".to_string(),
                ))
            }
            None => {
                return Err(CollectionError::NotACollection(
                    "missing `features` array".to_string(),
                ))
            }
        };

        let mut features = Vec::with_capacity(records.len());
        let mut skipped = 0;
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<RawFeature>(record) {
                Ok(feature) => features.push(feature),
                Err(e) => {
                    skipped += 1;
                    warn!(index, error = %e, "Skipping malformed feature");
                }
            }
        }

        Ok(ParsedCollection {
            collection: FeatureCollection { features },
            skipped,
        })
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}
