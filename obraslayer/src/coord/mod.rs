//! Coordinate repair module
//!
//! Raw point coordinates arrive in several encodings: proper `[lng, lat]`
//! pairs, swapped `[lat, lng]` pairs, and a split-decimal artifact where the
//! integer and fractional parts of both numbers occupy separate slots
//! (`[3, 424204, -76, 491289]`). [`normalize`] turns all of them into a
//! [`LngLat`] or reports `None` when the shape cannot be repaired.

mod types;

pub use types::{
    LngLat, RegionBounds, REGION_MAX_LAT, REGION_MAX_LNG, REGION_MIN_LAT, REGION_MIN_LNG,
};

use serde_json::Value;
use tracing::debug;

/// Normalizes a raw coordinate array against the default region.
///
/// # Returns
///
/// The position in GeoJSON order, or `None` for empty input, non-finite
/// elements, unsupported lengths (anything but 2 or 4) and split decimals
/// that do not rebuild into finite numbers.
#[inline]
pub fn normalize(raw: &[f64]) -> Option<LngLat> {
    normalize_in(raw, &RegionBounds::CALI)
}

/// Normalizes a raw coordinate array against explicit region bands.
pub fn normalize_in(raw: &[f64], bounds: &RegionBounds) -> Option<LngLat> {
    let result = match raw {
        _ if raw.iter().any(|v| !v.is_finite()) => None,
        [a, b] => Some(order_pair(*a, *b, bounds)),
        [a, b, c, d] => {
            let lat = join_split_decimal(*a, *b)?;
            let lng = join_split_decimal(*c, *d)?;
            Some(order_pair(lat, lng, bounds))
        }
        _ => None,
    };

    if result.is_none() && !raw.is_empty() {
        debug!(
            len = raw.len(),
            raw = ?raw,
            "Coordinate could not be normalized"
        );
    }

    result
}

/// Normalizes the raw JSON `coordinates` member of a Point geometry.
///
/// Finite numeric strings are accepted; `"NaN"`, `"inf"`, any other
/// non-number element, or a non-array value yields `None`.
pub fn normalize_value(value: &Value) -> Option<LngLat> {
    let items = value.as_array()?;
    let mut raw = Vec::with_capacity(items.len());
    for item in items {
        let number = match item {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite())?,
            _ => {
                debug!(value = %value, "Coordinate array holds a non-numeric element");
                return None;
            }
        };
        raw.push(number);
    }
    normalize(&raw)
}

/// Applies the regional band check to a pair and returns it as `(lng, lat)`.
///
/// Unknown pairs are assumed to be `(lat, lng)` and only reordered.
fn order_pair(a: f64, b: f64, bounds: &RegionBounds) -> LngLat {
    if bounds.contains_lat(a) && bounds.contains_lng(b) {
        LngLat::new(b, a)
    } else if bounds.contains_lat(b) && bounds.contains_lng(a) {
        LngLat::new(a, b)
    } else {
        LngLat::new(b, a)
    }
}

/// Rebuilds `"{int}.{frac}"` from two array slots.
///
/// Both slots must hold whole numbers and the fractional slot cannot be
/// negative. Leading zeros of the fraction are lost upstream and cannot be
/// recovered here.
fn join_split_decimal(int_part: f64, frac_part: f64) -> Option<f64> {
    if !int_part.is_finite() || !frac_part.is_finite() {
        return None;
    }
    if int_part.fract() != 0.0 || frac_part.fract() != 0.0 || frac_part < 0.0 {
        return None;
    }

    let sign = if int_part.is_sign_negative() { "-" } else { "" };
    let text = format!("{}{}.{}", sign, int_part.abs() as u64, frac_part as u64);
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests;
