//! Raw feature → project unit conversion

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use super::fields::{self, FieldChain};
use super::location::{split_barrio_vereda, split_comuna_corregimiento, BarrioVereda, ComunaCorregimiento};
use super::status::map_status;
use super::unit::ProjectUnit;
use crate::coord;
use crate::feature::{FeatureCollection, RawFeature, SourceTag};

/// Converts one raw feature into a [`ProjectUnit`].
///
/// Never fails: every attribute has a default. `index` is the feature's
/// position in its collection and backs the last-resort id.
pub fn to_project_unit(feature: &RawFeature, index: usize, source: &SourceTag) -> ProjectUnit {
    let p = &feature.properties;

    let id = fields::ID
        .text(p)
        .or_else(|| feature.id_text())
        .unwrap_or_else(|| format!("{}-{}", source, index));

    let name = name_chain(source)
        .text(p)
        .unwrap_or_else(|| format!("Unidad {}", id));

    let status_raw = fields::STATUS.text(p);
    let status = map_status(status_raw.as_deref());

    let area = match fields::COMUNA_CORREGIMIENTO.text(p) {
        Some(combined) => split_comuna_corregimiento(&combined),
        None => ComunaCorregimiento {
            comuna: fields::COMUNA.text(p),
            corregimiento: fields::CORREGIMIENTO.text(p),
        },
    };
    let neighbourhood = match fields::BARRIO_VEREDA.text(p) {
        Some(combined) => split_barrio_vereda(&combined),
        None => BarrioVereda {
            barrio: fields::BARRIO.text(p),
            vereda: fields::VEREDA.text(p),
        },
    };

    let (lat, lng) = match feature.geometry.as_ref() {
        Some(geometry) if geometry.is_point() => match coord::normalize_value(&geometry.coordinates) {
            Some(position) => (Some(position.lat), Some(position.lng)),
            None => {
                debug!(source = %source, id = %id, "Point unit has no usable coordinate");
                (None, None)
            }
        },
        _ => (None, None),
    };

    ProjectUnit {
        bpin: fields::BPIN.text_or(p, fields::DEFAULT_BPIN),
        name,
        status,
        comuna: area.comuna,
        corregimiento: area.corregimiento,
        barrio: neighbourhood.barrio,
        vereda: neighbourhood.vereda,
        budget: amount(&fields::BUDGET, p),
        executed: amount(&fields::EXECUTED, p),
        paid: amount(&fields::PAID, p),
        beneficiaries: fields::BENEFICIARIES.integer(p).unwrap_or(0),
        start_date: fields::START_DATE.date(p).unwrap_or_else(|| fields::DEFAULT_START_DATE.to_string()),
        end_date: fields::END_DATE.date(p).unwrap_or_else(|| fields::DEFAULT_END_DATE.to_string()),
        responsible: fields::RESPONSIBLE.text_or(p, fields::DEFAULT_RESPONSIBLE),
        progress: progress(p),
        intervention_type: fields::INTERVENTION_TYPE.text_or(p, fields::DEFAULT_UNSPECIFIED),
        work_class: work_class_chain(source).text_or(p, fields::DEFAULT_UNSPECIFIED),
        description: fields::DESCRIPTION.text(p),
        address: fields::ADDRESS.text(p),
        funding_source: fields::FUNDING_SOURCE.text(p),
        year: fields::YEAR
            .number(p)
            .filter(|y| (1900.0..=2100.0).contains(y))
            .map(|y| y as u16),
        lat,
        lng,
        geometry: feature.geometry.clone(),
        source: source.clone(),
        id,
    }
}

/// Converts a whole collection, keeping ids unique within the source.
///
/// An id already handed out gets the first free `-{n}` suffix, `n`
/// counting from 2.
pub fn map_collection(collection: &FeatureCollection, source: &SourceTag) -> Vec<ProjectUnit> {
    let mut assigned: HashSet<String> = HashSet::with_capacity(collection.len());
    let mut units = Vec::with_capacity(collection.len());

    for (index, feature) in collection.features.iter().enumerate() {
        let mut unit = to_project_unit(feature, index, source);

        if assigned.contains(&unit.id) {
            let unique = (2usize..)
                .map(|n| format!("{}-{}", unit.id, n))
                .find(|candidate| !assigned.contains(candidate))
                .unwrap_or_else(|| format!("{}-{}", unit.id, index));
            debug!(source = %source, id = %unit.id, unique = %unique, "Duplicate unit id renamed");
            unit.id = unique;
        }
        assigned.insert(unit.id.clone());

        units.push(unit);
    }

    units
}

fn name_chain(source: &SourceTag) -> FieldChain {
    match source {
        SourceTag::InfraestructuraVial => fields::NAME_VIAL,
        _ => fields::NAME,
    }
}

fn work_class_chain(source: &SourceTag) -> FieldChain {
    match source {
        SourceTag::InfraestructuraVial => fields::WORK_CLASS_VIAL,
        _ => fields::WORK_CLASS,
    }
}

fn amount(chain: &FieldChain, p: &Map<String, Value>) -> f64 {
    chain.number(p).unwrap_or(0.0)
}

/// Progress is a fraction in the source; values above 1 are already percent.
fn progress(p: &Map<String, Value>) -> f64 {
    match fields::PROGRESS.number(p) {
        Some(v) if v > 1.0 => v.min(100.0),
        Some(v) => (v * 100.0).max(0.0),
        None => 0.0,
    }
}
