//! Raw feature collection model.
//!
//! These types mirror the interchange format served by the dataset origin:
//! a feature collection of geometry + property-bag records. Properties stay
//! untyped here; the [`crate::mapper`] module turns them into domain units.

mod source;
mod types;

pub use source::SourceTag;
pub use types::{CollectionError, FeatureCollection, Geometry, GeometryKind, ParsedCollection, RawFeature};
