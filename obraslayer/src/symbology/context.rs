//! Layer-wide inputs to style resolution

use std::collections::HashMap;

use super::choropleth::{synthetic_value, SyntheticMetric};
use super::color::{Color, DEFAULT_PALETTE};
use super::layer::{LayerDescriptor, StyleSource, Symbology};

/// Stable palette assignment for categorical values.
///
/// Values are keyed by their text form and take palette slots in the order
/// they are first seen, wrapping once the palette is exhausted.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    slots: HashMap<String, usize>,
    order: Vec<String>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a value; returns its slot.
    pub fn insert(&mut self, value: &str) -> usize {
        if let Some(slot) = self.slots.get(value) {
            return *slot;
        }
        let slot = self.order.len();
        self.slots.insert(value.to_string(), slot);
        self.order.push(value.to_string());
        slot
    }

    pub fn slot(&self, value: &str) -> Option<usize> {
        self.slots.get(value).copied()
    }

    pub fn color(&self, value: &str) -> Option<Color> {
        self.slot(value)
            .map(|slot| DEFAULT_PALETTE[slot % DEFAULT_PALETTE.len()])
    }

    /// Distinct values in first-seen order.
    pub fn values(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Precomputed, layer-wide data the resolver needs.
#[derive(Debug, Clone, Default)]
pub struct StyleContext {
    pub categories: CategoryIndex,
    /// Largest choropleth value among visible features
    pub max_value: f64,
}

impl StyleContext {
    /// Builds the context for a layer.
    ///
    /// Categories are collected over every feature so colors do not shift
    /// when the visible subset changes; the choropleth maximum only counts
    /// features for which `is_visible` holds.
    pub fn for_layer(layer: &LayerDescriptor, is_visible: impl Fn(usize) -> bool) -> Self {
        let mut ctx = Self::default();

        match &layer.symbology {
            Symbology::Categories { attribute } | Symbology::Icons { attribute, .. } => {
                for (_, feature) in layer.sources() {
                    if let Some(value) = feature.attribute(attribute) {
                        ctx.categories.insert(&value.as_text());
                    }
                }
            }
            Symbology::Choropleth { attribute, metric } => {
                ctx.max_value = layer
                    .sources()
                    .filter(|(index, _)| is_visible(*index))
                    .map(|(index, feature)| {
                        choropleth_value(feature, index, attribute.as_deref(), *metric)
                    })
                    .fold(0.0, f64::max);
            }
            Symbology::Solid | Symbology::Ranges { .. } => {}
        }

        ctx
    }
}

/// The value a choropleth layer plots for a feature.
pub fn choropleth_value<F: StyleSource + ?Sized>(
    feature: &F,
    index: usize,
    attribute: Option<&str>,
    metric: SyntheticMetric,
) -> f64 {
    attribute
        .and_then(|key| feature.attribute(key))
        .and_then(|value| value.as_number())
        .filter(|n| n.is_finite())
        .unwrap_or_else(|| synthetic_value(feature.label(), index, metric))
}
