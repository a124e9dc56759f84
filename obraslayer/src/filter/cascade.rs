//! Cascading geographic selection

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::matcher::contains_ignore_case;
use super::types::{FilterSet, GeoLevel};
use crate::mapper::ProjectUnit;

/// Registered parent → children relations, learned from the data.
///
/// Parents are keyed by their lower-cased name; children keep the spelling
/// they were first seen with.
#[derive(Debug, Clone, Default)]
pub struct GeoHierarchy {
    comuna_barrios: BTreeMap<String, BTreeSet<String>>,
    corregimiento_veredas: BTreeMap<String, BTreeSet<String>>,
}

impl GeoHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every comuna/barrio and corregimiento/vereda pair found
    /// on the units.
    pub fn from_units(units: &[ProjectUnit]) -> Self {
        let mut hierarchy = Self::new();
        for unit in units {
            if let (Some(comuna), Some(barrio)) = (&unit.comuna, &unit.barrio) {
                hierarchy.register(GeoLevel::Comuna, comuna, barrio);
            }
            if let (Some(corregimiento), Some(vereda)) = (&unit.corregimiento, &unit.vereda) {
                hierarchy.register(GeoLevel::Corregimiento, corregimiento, vereda);
            }
        }
        hierarchy
    }

    /// Registers `child` under `parent`. Ignored unless `level` is a parent level.
    pub fn register(&mut self, level: GeoLevel, parent: &str, child: &str) {
        let Some(map) = self.map_mut(level) else {
            return;
        };
        let children = map.entry(parent.trim().to_lowercase()).or_default();
        if !contains_ignore_case(children, child) {
            children.insert(child.trim().to_string());
        }
    }

    /// Registered children of one parent.
    pub fn children(&self, level: GeoLevel, parent: &str) -> Option<&BTreeSet<String>> {
        self.map(level)?.get(&parent.trim().to_lowercase())
    }

    /// Lower-cased parent keys registered at `level`.
    pub fn parents(&self, level: GeoLevel) -> impl Iterator<Item = &str> {
        self.map(level)
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    fn map(&self, level: GeoLevel) -> Option<&BTreeMap<String, BTreeSet<String>>> {
        match level {
            GeoLevel::Comuna => Some(&self.comuna_barrios),
            GeoLevel::Corregimiento => Some(&self.corregimiento_veredas),
            _ => None,
        }
    }

    fn map_mut(&mut self, level: GeoLevel) -> Option<&mut BTreeMap<String, BTreeSet<String>>> {
        match level {
            GeoLevel::Comuna => Some(&mut self.comuna_barrios),
            GeoLevel::Corregimiento => Some(&mut self.corregimiento_veredas),
            _ => None,
        }
    }

    /// Union of the children of `parents`, lower-cased.
    fn reachable<'a>(
        &self,
        level: GeoLevel,
        parents: impl IntoIterator<Item = &'a String>,
    ) -> BTreeSet<String> {
        parents
            .into_iter()
            .filter_map(|parent| self.children(level, parent))
            .flatten()
            .map(|child| child.to_lowercase())
            .collect()
    }
}

impl FilterSet {
    /// Selects a comuna or corregimiento.
    pub fn select_parent(&mut self, level: GeoLevel, value: &str) {
        if !level.is_parent() {
            return;
        }
        let set = self.geo_mut(level);
        if !contains_ignore_case(set, value) {
            set.insert(value.trim().to_string());
        }
    }

    /// Deselects a comuna or corregimiento and drops any selected child no
    /// remaining selected parent contains.
    pub fn deselect_parent(&mut self, hierarchy: &GeoHierarchy, level: GeoLevel, value: &str) {
        let Some(child_level) = level.child() else {
            return;
        };

        let needle = value.trim().to_lowercase();
        self.geo_mut(level)
            .retain(|parent| parent.trim().to_lowercase() != needle);

        let reachable = hierarchy.reachable(level, self.geo(level));
        let children = self.geo_mut(child_level);
        let before = children.len();
        children.retain(|child| reachable.contains(&child.trim().to_lowercase()));

        debug!(
            level = %level,
            parent = value,
            dropped = before - children.len(),
            "Deselected parent"
        );
    }

    /// Selects a barrio or vereda.
    ///
    /// Only allowed when the parent dimension is inactive or one of the
    /// selected parents contains the child. Returns whether the child is
    /// now selected.
    pub fn select_child(&mut self, hierarchy: &GeoHierarchy, level: GeoLevel, value: &str) -> bool {
        let Some(parent_level) = level.parent() else {
            return false;
        };

        let parents = self.geo(parent_level);
        if !parents.is_empty() {
            let reachable = hierarchy.reachable(parent_level, parents);
            if !reachable.contains(&value.trim().to_lowercase()) {
                debug!(level = %level, value, "Rejected child outside selected parents");
                return false;
            }
        }

        let set = self.geo_mut(level);
        if !contains_ignore_case(set, value) {
            set.insert(value.trim().to_string());
        }
        true
    }

    /// Deselects a barrio or vereda.
    pub fn deselect_child(&mut self, level: GeoLevel, value: &str) {
        if level.parent().is_none() {
            return;
        }
        let needle = value.trim().to_lowercase();
        self.geo_mut(level)
            .retain(|child| child.trim().to_lowercase() != needle);
    }

    /// Children the UI may offer at `level` given the current parent
    /// selection: everything registered when no parent is selected.
    pub fn available_children(&self, hierarchy: &GeoHierarchy, level: GeoLevel) -> BTreeSet<String> {
        let Some(parent_level) = level.parent() else {
            return BTreeSet::new();
        };

        let parents = self.geo(parent_level);
        let keys: Vec<String> = if parents.is_empty() {
            hierarchy.parents(parent_level).map(str::to_string).collect()
        } else {
            parents.iter().cloned().collect()
        };

        keys.iter()
            .filter_map(|parent| hierarchy.children(parent_level, parent))
            .flatten()
            .cloned()
            .collect()
    }
}
