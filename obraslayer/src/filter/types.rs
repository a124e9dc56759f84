//! Filter state types

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Level of the geographic hierarchy.
///
/// Urban comunas contain barrios; rural corregimientos contain veredas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeoLevel {
    Comuna,
    Barrio,
    Corregimiento,
    Vereda,
}

impl GeoLevel {
    pub fn is_parent(&self) -> bool {
        matches!(self, GeoLevel::Comuna | GeoLevel::Corregimiento)
    }

    /// Parent level of a child level.
    pub fn parent(&self) -> Option<GeoLevel> {
        match self {
            GeoLevel::Barrio => Some(GeoLevel::Comuna),
            GeoLevel::Vereda => Some(GeoLevel::Corregimiento),
            _ => None,
        }
    }

    /// Child level of a parent level.
    pub fn child(&self) -> Option<GeoLevel> {
        match self {
            GeoLevel::Comuna => Some(GeoLevel::Barrio),
            GeoLevel::Corregimiento => Some(GeoLevel::Vereda),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeoLevel::Comuna => "comuna",
            GeoLevel::Barrio => "barrio",
            GeoLevel::Corregimiento => "corregimiento",
            GeoLevel::Vereda => "vereda",
        }
    }
}

impl fmt::Display for GeoLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consumer-owned filter state.
///
/// Every dimension is inactive when empty. Values compare
/// case-insensitively against unit attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSet {
    pub search: String,
    pub estado: String,
    pub centro_gestor: BTreeSet<String>,
    pub comunas: BTreeSet<String>,
    pub barrios: BTreeSet<String>,
    pub corregimientos: BTreeSet<String>,
    pub veredas: BTreeSet<String>,
    pub fuentes_financiamiento: BTreeSet<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_estado(mut self, estado: impl Into<String>) -> Self {
        self.estado = estado.into();
        self
    }

    pub fn with_centro_gestor(mut self, value: impl Into<String>) -> Self {
        self.centro_gestor.insert(value.into());
        self
    }

    pub fn with_fuente(mut self, value: impl Into<String>) -> Self {
        self.fuentes_financiamiento.insert(value.into());
        self
    }

    /// Adds a geographic value without cascade checks.
    pub fn with_geo(mut self, level: GeoLevel, value: impl Into<String>) -> Self {
        self.geo_mut(level).insert(value.into());
        self
    }

    /// Selected values of a geographic level.
    pub fn geo(&self, level: GeoLevel) -> &BTreeSet<String> {
        match level {
            GeoLevel::Comuna => &self.comunas,
            GeoLevel::Barrio => &self.barrios,
            GeoLevel::Corregimiento => &self.corregimientos,
            GeoLevel::Vereda => &self.veredas,
        }
    }

    pub(crate) fn geo_mut(&mut self, level: GeoLevel) -> &mut BTreeSet<String> {
        match level {
            GeoLevel::Comuna => &mut self.comunas,
            GeoLevel::Barrio => &mut self.barrios,
            GeoLevel::Corregimiento => &mut self.corregimientos,
            GeoLevel::Vereda => &mut self.veredas,
        }
    }

    /// Resets every dimension.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when no dimension constrains the result.
    pub fn is_empty(&self) -> bool {
        self.active_dimensions().is_empty()
    }

    /// Names of the dimensions currently constraining the result.
    pub fn active_dimensions(&self) -> Vec<&'static str> {
        let dims: [(&'static str, bool); 8] = [
            ("search", !self.search.trim().is_empty()),
            ("estado", !self.estado.trim().is_empty()),
            ("centroGestor", !self.centro_gestor.is_empty()),
            ("comunas", !self.comunas.is_empty()),
            ("barrios", !self.barrios.is_empty()),
            ("corregimientos", !self.corregimientos.is_empty()),
            ("veredas", !self.veredas.is_empty()),
            ("fuentesFinanciamiento", !self.fuentes_financiamiento.is_empty()),
        ];
        dims.iter()
            .filter(|(_, active)| *active)
            .map(|(name, _)| *name)
            .collect()
    }
}
