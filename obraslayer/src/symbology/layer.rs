//! Layer descriptors and styleable features

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use super::choropleth::SyntheticMetric;
use super::color::{Color, DEFAULT_LAYER_COLOR};
use crate::feature::{FeatureCollection, RawFeature};
use crate::mapper::fields::{self, parse_number};
use crate::mapper::ProjectUnit;

/// Default stroke width.
pub const DEFAULT_WEIGHT: f64 = 2.0;

/// Default layer opacity.
pub const DEFAULT_OPACITY: f64 = 0.8;

/// Symbol used by icon layers for unmapped values.
pub const DEFAULT_SYMBOL: &str = "marker";

/// One `[min, max] → color` band of a ranges layer (bounds inclusive).
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBand {
    pub min: f64,
    pub max: f64,
    pub color: Color,
}

impl RangeBand {
    pub fn new(min: f64, max: f64, color: Color) -> Self {
        Self { min, max, color }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// How a layer turns features into colors.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbology {
    /// One color for every feature
    Solid,
    /// One palette color per distinct attribute value
    Categories { attribute: String },
    /// Numeric attribute bucketed into bands
    Ranges {
        attribute: String,
        bands: Vec<RangeBand>,
    },
    /// Symbol per categorical attribute value
    Icons {
        attribute: String,
        symbols: BTreeMap<String, String>,
        default_symbol: String,
    },
    /// Intensity relative to the layer maximum; uses a synthetic metric
    /// when `attribute` is unset or not numeric for a feature
    Choropleth {
        attribute: Option<String>,
        metric: SyntheticMetric,
    },
}

impl Symbology {
    pub fn mode(&self) -> SymbologyMode {
        match self {
            Symbology::Solid => SymbologyMode::Solid,
            Symbology::Categories { .. } => SymbologyMode::Categories,
            Symbology::Ranges { .. } => SymbologyMode::Ranges,
            Symbology::Icons { .. } => SymbologyMode::Icons,
            Symbology::Choropleth { .. } => SymbologyMode::Choropleth,
        }
    }

    /// The property key driving the mode, if any.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Symbology::Solid => None,
            Symbology::Categories { attribute }
            | Symbology::Ranges { attribute, .. }
            | Symbology::Icons { attribute, .. } => Some(attribute),
            Symbology::Choropleth { attribute, .. } => attribute.as_deref(),
        }
    }
}

/// Mode tag of a [`Symbology`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbologyMode {
    Solid,
    Categories,
    Ranges,
    Icons,
    Choropleth,
}

impl SymbologyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbologyMode::Solid => "solid",
            SymbologyMode::Categories => "categories",
            SymbologyMode::Ranges => "ranges",
            SymbologyMode::Icons => "icons",
            SymbologyMode::Choropleth => "choropleth",
        }
    }
}

impl fmt::Display for SymbologyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymbologyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "solid" => Ok(SymbologyMode::Solid),
            "categories" => Ok(SymbologyMode::Categories),
            "ranges" => Ok(SymbologyMode::Ranges),
            "icons" => Ok(SymbologyMode::Icons),
            "choropleth" => Ok(SymbologyMode::Choropleth),
            other => Err(format!("unknown symbology mode '{}'", other)),
        }
    }
}

/// Features a layer draws.
#[derive(Debug, Clone)]
pub enum LayerData {
    Units(Arc<Vec<ProjectUnit>>),
    Raw(Arc<FeatureCollection>),
}

impl LayerData {
    pub fn len(&self) -> usize {
        match self {
            LayerData::Units(units) => units.len(),
            LayerData::Raw(collection) => collection.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A feature of a layer, as handed back by click dispatch.
#[derive(Debug, Clone, Copy)]
pub enum LayerFeature<'a> {
    Unit(&'a ProjectUnit),
    Raw(&'a RawFeature),
}

/// A renderable layer.
#[derive(Debug, Clone)]
pub struct LayerDescriptor {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub color: Color,
    pub opacity: f64,
    pub weight: f64,
    pub symbology: Symbology,
    pub data: LayerData,
}

impl LayerDescriptor {
    /// Creates a visible, solid layer with default color and opacity.
    pub fn new(id: impl Into<String>, name: impl Into<String>, data: LayerData) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visible: true,
            color: DEFAULT_LAYER_COLOR,
            opacity: DEFAULT_OPACITY,
            weight: DEFAULT_WEIGHT,
            symbology: Symbology::Solid,
            data,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_symbology(mut self, symbology: Symbology) -> Self {
        self.symbology = symbology;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Iterates the layer's features as styleable sources, with their index.
    pub fn sources(&self) -> Box<dyn Iterator<Item = (usize, &dyn StyleSource)> + '_> {
        match &self.data {
            LayerData::Units(units) => Box::new(
                units
                    .iter()
                    .enumerate()
                    .map(|(i, unit)| (i, unit as &dyn StyleSource)),
            ),
            LayerData::Raw(collection) => Box::new(
                collection
                    .features
                    .iter()
                    .enumerate()
                    .map(|(i, feature)| (i, feature as &dyn StyleSource)),
            ),
        }
    }

    /// Looks up the feature a click event refers to.
    pub fn feature_at(&self, index: usize) -> Option<LayerFeature<'_>> {
        match &self.data {
            LayerData::Units(units) => units.get(index).map(LayerFeature::Unit),
            LayerData::Raw(collection) => collection.features.get(index).map(LayerFeature::Raw),
        }
    }
}

/// A scalar attribute value read from a feature.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Number(f64),
}

impl AttributeValue {
    /// Numeric view; numeric strings are parsed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::Text(s) => parse_number(s),
        }
    }

    /// Text view; integral numbers render without a fraction.
    pub fn as_text(&self) -> String {
        match self {
            AttributeValue::Text(s) => s.clone(),
            AttributeValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            AttributeValue::Number(n) => n.to_string(),
        }
    }
}

/// Anything the resolver can style.
pub trait StyleSource {
    /// Reads an attribute by property key.
    fn attribute(&self, key: &str) -> Option<AttributeValue>;

    /// Name fed to the synthetic metric generator.
    fn label(&self) -> &str;
}

impl StyleSource for ProjectUnit {
    /// Accepts domain names (`budget`, `workClass`) and the dataset names
    /// (`presupuesto_base`, `clase_obra`); case and underscores are ignored.
    fn attribute(&self, key: &str) -> Option<AttributeValue> {
        let key: String = key
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_lowercase();

        let text = |s: &str| Some(AttributeValue::Text(s.to_string()));
        let opt = |s: &Option<String>| s.as_deref().map(|v| AttributeValue::Text(v.to_string()));
        let num = |n: f64| Some(AttributeValue::Number(n));

        match key.as_str() {
            "id" | "upid" => text(&self.id),
            "bpin" => text(&self.bpin),
            "name" | "nombre" | "nickname" | "nombreup" => text(&self.name),
            "status" | "estado" => text(self.status.label()),
            "comuna" => opt(&self.comuna),
            "barrio" => opt(&self.barrio),
            "corregimiento" => opt(&self.corregimiento),
            "vereda" => opt(&self.vereda),
            "budget" | "presupuesto" | "presupuestobase" => num(self.budget),
            "executed" | "ejecutado" | "ejecucionfinanciera" => num(self.executed),
            "paid" | "pagado" | "pagosrealizados" => num(self.paid),
            "beneficiaries" | "beneficiarios" | "usuariosbeneficiarios" => {
                num(self.beneficiaries as f64)
            }
            "progress" | "avance" | "avanceobra" => num(self.progress),
            "responsible" | "centrogestor" | "nombrecentrogestor" => text(&self.responsible),
            "interventiontype" | "tipointervencion" => text(&self.intervention_type),
            "workclass" | "claseobra" => text(&self.work_class),
            "fundingsource" | "fuentefinanciacion" => opt(&self.funding_source),
            "year" | "ano" | "anio" => self.year.map(|y| AttributeValue::Number(y as f64)),
            "source" => text(self.source.as_str()),
            _ => None,
        }
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl StyleSource for RawFeature {
    fn attribute(&self, key: &str) -> Option<AttributeValue> {
        match self.properties.get(key)? {
            Value::Number(n) => n.as_f64().map(AttributeValue::Number),
            Value::String(s) => Some(AttributeValue::Text(s.trim().to_string())),
            Value::Bool(b) => Some(AttributeValue::Text(b.to_string())),
            _ => None,
        }
    }

    fn label(&self) -> &str {
        fields::NAME
            .first_present(&self.properties)
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}
