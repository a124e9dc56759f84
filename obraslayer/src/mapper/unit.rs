//! The project unit domain entity

use serde::Serialize;

use super::status::ProjectStatus;
use crate::feature::{Geometry, SourceTag};

/// One physical intervention: an equipment site or a road segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUnit {
    /// Unique within `source`
    pub id: String,
    pub bpin: String,
    pub name: String,
    pub status: ProjectStatus,

    pub comuna: Option<String>,
    pub barrio: Option<String>,
    pub corregimiento: Option<String>,
    pub vereda: Option<String>,

    pub budget: f64,
    pub executed: f64,
    pub paid: f64,
    pub beneficiaries: u64,

    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    pub responsible: String,
    /// Physical progress in percent (0-100)
    pub progress: f64,
    pub intervention_type: String,
    pub work_class: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub funding_source: Option<String>,
    pub year: Option<u16>,

    /// Set only for Point geometries whose coordinate could be normalized
    pub lat: Option<f64>,
    pub lng: Option<f64>,

    /// Geometry exactly as received
    pub geometry: Option<Geometry>,
    #[serde(serialize_with = "serialize_source")]
    pub source: SourceTag,
}

impl ProjectUnit {
    /// Returns true if the unit can be drawn as a point marker.
    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lng.is_some()
    }

    /// Returns `(lng, lat)` when both are known.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.lng?, self.lat?))
    }

    /// Text used by free-text search, in fixed attribute order.
    pub fn search_text(&self) -> String {
        let fields: [Option<&str>; 11] = [
            Some(&self.name),
            Some(&self.bpin),
            Some(&self.responsible),
            self.comuna.as_deref(),
            self.barrio.as_deref(),
            self.corregimiento.as_deref(),
            self.vereda.as_deref(),
            Some(&self.intervention_type),
            Some(&self.work_class),
            self.description.as_deref(),
            self.address.as_deref(),
        ];

        fields
            .iter()
            .map(|f| f.unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" | ")
            .to_lowercase()
    }
}

fn serialize_source<S>(source: &SourceTag, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(source.as_str())
}
