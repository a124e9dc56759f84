//! Raw property bags → typed project units.
//!
//! The datasets do not share a schema. Each attribute of [`ProjectUnit`] is
//! read through a declarative [`FieldChain`] of candidate keys, then
//! post-processed (status rules, area splitting, numeric and date parsing).
//! Mapping never fails; every attribute has a default.
//!
//! # Example
//!
//! ```
//! use obraslayer::feature::{RawFeature, SourceTag};
//! use obraslayer::mapper::{to_project_unit, ProjectStatus};
//!
//! let feature: RawFeature = serde_json::from_str(r#"{
//!     "geometry": { "type": "Point", "coordinates": [3, 424204, -76, 491289] },
//!     "properties": { "nickname": "Sede Comunal", "estado": "En ejecución" }
//! }"#).unwrap();
//!
//! let unit = to_project_unit(&feature, 0, &SourceTag::Equipamientos);
//! assert_eq!(unit.name, "Sede Comunal");
//! assert_eq!(unit.status, ProjectStatus::EnEjecucion);
//! assert_eq!(unit.lng, Some(-76.491289));
//! ```

mod convert;
pub mod fields;
mod location;
mod status;
mod unit;

pub use convert::{map_collection, to_project_unit};
pub use fields::FieldChain;
pub use location::{split_barrio_vereda, split_comuna_corregimiento, BarrioVereda, ComunaCorregimiento};
pub use status::{map_status, ProjectStatus};
pub use unit::ProjectUnit;
