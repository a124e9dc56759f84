//! Filter predicate

use std::collections::BTreeSet;

use tracing::debug;

use super::types::FilterSet;
use crate::mapper::ProjectUnit;

/// Checks a unit against every active dimension of `filters`.
pub fn matches(unit: &ProjectUnit, filters: &FilterSet) -> bool {
    let search = filters.search.trim();
    if !search.is_empty() && !unit.search_text().contains(&search.to_lowercase()) {
        return false;
    }

    let estado = filters.estado.trim();
    if !estado.is_empty() && !unit.status.matches_name(estado) {
        return false;
    }

    accepts(&filters.centro_gestor, Some(&unit.responsible))
        && accepts(&filters.comunas, unit.comuna.as_deref())
        && accepts(&filters.barrios, unit.barrio.as_deref())
        && accepts(&filters.corregimientos, unit.corregimiento.as_deref())
        && accepts(&filters.veredas, unit.vereda.as_deref())
        && accepts(&filters.fuentes_financiamiento, unit.funding_source.as_deref())
}

/// Units passing `filters`, in input order.
pub fn apply_all<'a>(units: &'a [ProjectUnit], filters: &FilterSet) -> Vec<&'a ProjectUnit> {
    let matched: Vec<&ProjectUnit> = units.iter().filter(|u| matches(u, filters)).collect();
    debug!(
        total = units.len(),
        matched = matched.len(),
        active = ?filters.active_dimensions(),
        "Applied filters"
    );
    matched
}

/// Owned variant of [`apply_all`].
pub fn apply_all_cloned(units: &[ProjectUnit], filters: &FilterSet) -> Vec<ProjectUnit> {
    apply_all(units, filters).into_iter().cloned().collect()
}

/// An empty set accepts anything; otherwise the value must be present and
/// equal one entry ignoring case.
fn accepts(selected: &BTreeSet<String>, value: Option<&str>) -> bool {
    if selected.is_empty() {
        return true;
    }
    match value {
        Some(value) => contains_ignore_case(selected, value),
        None => false,
    }
}

pub(crate) fn contains_ignore_case(set: &BTreeSet<String>, value: &str) -> bool {
    let value = value.trim().to_lowercase();
    set.iter().any(|s| s.trim().to_lowercase() == value)
}
