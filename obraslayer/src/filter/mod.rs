//! Filtering of project units.
//!
//! [`matches`] is a pure predicate over a [`ProjectUnit`](crate::mapper::ProjectUnit)
//! and a consumer-owned [`FilterSet`]. The cascade helpers on `FilterSet`
//! keep barrio and vereda selections consistent with the selected comunas
//! and corregimientos, using a [`GeoHierarchy`] learned from the data.

mod cascade;
mod matcher;
mod types;

pub use cascade::GeoHierarchy;
pub use matcher::{apply_all, apply_all_cloned, matches};
pub use types::{FilterSet, GeoLevel};
