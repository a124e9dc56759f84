//! Per-feature style resolution.
//!
//! A [`LayerDescriptor`] carries a [`Symbology`] that decides how each of its
//! features is colored. [`resolve_style`] is a pure function of the feature,
//! its index, the layer and a [`StyleContext`] holding the layer-wide values
//! (category order, choropleth maximum) some modes need.
//!
//! ```
//! use std::sync::Arc;
//! use obraslayer::symbology::{resolve_style, LayerData, LayerDescriptor, StyleContext};
//!
//! let layer = LayerDescriptor::new("obras", "Obras", LayerData::Units(Arc::new(Vec::new())));
//! let ctx = StyleContext::for_layer(&layer, |_| true);
//! assert!(layer.feature_at(0).is_none());
//! assert_eq!(ctx.max_value, 0.0);
//! ```

mod choropleth;
mod color;
mod context;
mod layer;

pub use choropleth::{choropleth_color, intensity, synthetic_value, SyntheticMetric};
pub use color::{Color, DEFAULT_LAYER_COLOR, DEFAULT_PALETTE, NEUTRAL_COLOR};
pub use context::{choropleth_value, CategoryIndex, StyleContext};
pub use layer::{
    AttributeValue, LayerData, LayerDescriptor, LayerFeature, RangeBand, StyleSource, Symbology,
    SymbologyMode, DEFAULT_OPACITY, DEFAULT_SYMBOL, DEFAULT_WEIGHT,
};

use serde::Serialize;

/// Render style for one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(serialize_with = "serialize_color")]
    pub stroke_color: Color,
    #[serde(serialize_with = "serialize_color")]
    pub fill_color: Color,
    pub weight: f64,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

fn serialize_color<S: serde::Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(color)
}

impl Style {
    fn uniform(layer: &LayerDescriptor, color: Color) -> Self {
        Self {
            stroke_color: color,
            fill_color: color,
            weight: layer.weight,
            opacity: layer.opacity,
            symbol: None,
        }
    }
}

/// Computes the style of the feature at `index` in `layer`.
pub fn resolve_style<F: StyleSource + ?Sized>(
    feature: &F,
    index: usize,
    layer: &LayerDescriptor,
    ctx: &StyleContext,
) -> Style {
    match &layer.symbology {
        Symbology::Solid => Style::uniform(layer, layer.color),
        Symbology::Categories { attribute } => {
            let color = feature
                .attribute(attribute)
                .and_then(|value| ctx.categories.color(&value.as_text()))
                .unwrap_or(layer.color);
            Style::uniform(layer, color)
        }
        Symbology::Ranges { attribute, bands } => {
            let color = feature
                .attribute(attribute)
                .and_then(|value| value.as_number())
                .and_then(|n| bands.iter().find(|band| band.contains(n)))
                .map(|band| band.color)
                .unwrap_or(layer.color);
            Style::uniform(layer, color)
        }
        Symbology::Icons {
            attribute,
            symbols,
            default_symbol,
        } => {
            let symbol = feature
                .attribute(attribute)
                .and_then(|value| symbols.get(&value.as_text()))
                .unwrap_or(default_symbol);
            Style {
                symbol: Some(symbol.clone()),
                ..Style::uniform(layer, layer.color)
            }
        }
        Symbology::Choropleth { attribute, metric } => {
            let value = choropleth_value(feature, index, attribute.as_deref(), *metric);
            Style {
                fill_color: choropleth_color(layer.color, value, ctx.max_value),
                ..Style::uniform(layer, layer.color)
            }
        }
    }
}

/// Styles every feature of a layer accepted by `is_visible`.
///
/// Returns `(index, style)` pairs in feature order; a hidden layer yields
/// nothing.
pub fn style_layer(layer: &LayerDescriptor, is_visible: impl Fn(usize) -> bool) -> Vec<(usize, Style)> {
    if !layer.visible {
        return Vec::new();
    }

    let ctx = StyleContext::for_layer(layer, &is_visible);
    layer
        .sources()
        .filter(|(index, _)| is_visible(*index))
        .map(|(index, feature)| (index, resolve_style(feature, index, layer, &ctx)))
        .collect()
}
