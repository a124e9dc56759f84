//! Dataset source tags

use std::fmt;
use std::path::Path;

/// Identifies which dataset produced a unit.
///
/// The two known datasets have their own field conventions; anything else
/// is mapped with the generic chains and tagged by its file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceTag {
    /// Equipment sites (schools, parks, health posts); mostly points
    Equipamientos,
    /// Road segments; lines
    InfraestructuraVial,
    /// Any other dataset
    Other(String),
}

impl SourceTag {
    /// Derives the tag from a resource key such as `data/equipamientos.geojson`.
    pub fn from_key(key: &str) -> Self {
        let stem = Path::new(key)
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        // `foo.geojson.json` style names
        let stem = stem.trim_end_matches(".geojson").to_string();

        if stem.contains("equipamiento") {
            SourceTag::Equipamientos
        } else if stem.contains("vial") || stem.contains("infraestructura") {
            SourceTag::InfraestructuraVial
        } else {
            SourceTag::Other(stem)
        }
    }

    /// Short name used in ids and logs.
    pub fn as_str(&self) -> &str {
        match self {
            SourceTag::Equipamientos => "equipamientos",
            SourceTag::InfraestructuraVial => "infraestructura_vial",
            SourceTag::Other(name) => name,
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
