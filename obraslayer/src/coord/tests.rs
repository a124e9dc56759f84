//! Tests for coordinate normalization

use super::*;
use proptest::prelude::*;
use serde_json::json;

fn assert_close(actual: LngLat, lng: f64, lat: f64) {
    assert!(
        (actual.lng - lng).abs() < 1e-9 && (actual.lat - lat).abs() < 1e-9,
        "expected [{}, {}], got {}",
        lng,
        lat,
        actual
    );
}

#[test]
fn test_split_decimal_reconstruction() {
    let result = normalize(&[3.0, 424204.0, -76.0, 491289.0]);
    assert!(result.is_some(), "Split decimal should be repaired");
    assert_close(result.unwrap(), -76.491289, 3.424204);
}

#[test]
fn test_lat_lng_pair_is_reordered() {
    let result = normalize(&[3.41, -76.52]).unwrap();
    assert_close(result, -76.52, 3.41);
}

#[test]
fn test_lng_lat_pair_is_unchanged() {
    let result = normalize(&[-76.52, 3.41]).unwrap();
    assert_close(result, -76.52, 3.41);
}

#[test]
fn test_pair_outside_region_is_only_reordered() {
    // Bogotá is outside the Cali bands: treated as (lat, lng)
    let result = normalize(&[4.711, -74.072]).unwrap();
    assert_close(result, -74.072, 4.711);
}

#[test]
fn test_empty_input_is_rejected() {
    assert!(normalize(&[]).is_none());
}

#[test]
fn test_unsupported_lengths_are_rejected() {
    assert!(normalize(&[1.0]).is_none());
    assert!(normalize(&[1.0, 2.0, 3.0]).is_none());
    assert!(normalize(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_none());
}

#[test]
fn test_split_decimal_rejects_fractional_slots() {
    assert!(normalize(&[3.5, 424204.0, -76.0, 491289.0]).is_none());
    assert!(normalize(&[3.0, -424204.0, -76.0, 491289.0]).is_none());
    assert!(normalize(&[3.0, f64::NAN, -76.0, 491289.0]).is_none());
}

#[test]
fn test_split_decimal_swapped_halves_are_corrected() {
    // Longitude first in the split encoding still lands in (lng, lat) order
    let result = normalize(&[-76.0, 491289.0, 3.0, 424204.0]).unwrap();
    assert_close(result, -76.491289, 3.424204);
}

#[test]
fn test_normalize_value_accepts_numeric_strings() {
    let result = normalize_value(&json!(["3.41", "-76.52"])).unwrap();
    assert_close(result, -76.52, 3.41);
}

#[test]
fn test_normalize_value_rejects_non_arrays() {
    assert!(normalize_value(&json!("3.41,-76.52")).is_none());
    assert!(normalize_value(&json!(null)).is_none());
    assert!(normalize_value(&json!({"lat": 3.41})).is_none());
}

#[test]
fn test_normalize_value_rejects_mixed_elements() {
    assert!(normalize_value(&json!([3.41, null])).is_none());
    assert!(normalize_value(&json!([3.41, "abc"])).is_none());
}

#[test]
fn test_non_finite_elements_are_rejected() {
    assert!(normalize(&[f64::NAN, -76.52]).is_none());
    assert!(normalize(&[3.41, f64::INFINITY]).is_none());
    assert!(normalize(&[3.0, 424204.0, f64::NEG_INFINITY, 491289.0]).is_none());
}

#[test]
fn test_normalize_value_rejects_non_finite_strings() {
    assert!(normalize_value(&json!(["NaN", "inf"])).is_none());
    assert!(normalize_value(&json!(["3.41", "infinity"])).is_none());
    assert!(normalize_value(&json!(["-inf", "-76.52"])).is_none());
}

#[test]
fn test_explicit_bounds() {
    let bounds = RegionBounds {
        min_lat: 4.0,
        max_lat: 5.0,
        min_lng: -75.0,
        max_lng: -74.0,
    };
    let result = normalize_in(&[-74.072, 4.711], &bounds).unwrap();
    assert_close(result, -74.072, 4.711);
    assert!(result.in_region(&bounds));
    assert!(!result.in_region(&RegionBounds::CALI));
}

proptest! {
    /// Property: a correct in-region (lng, lat) pair survives normalization unchanged.
    #[test]
    fn prop_normalize_is_idempotent_in_region(
        lng in REGION_MIN_LNG..REGION_MAX_LNG,
        lat in REGION_MIN_LAT..REGION_MAX_LAT,
    ) {
        let first = normalize(&[lng, lat]).unwrap();
        let second = normalize(&first.to_array()).unwrap();
        prop_assert_eq!(first, LngLat::new(lng, lat));
        prop_assert_eq!(first, second);
    }

    /// Property: normalization never panics and never yields a non-finite position.
    #[test]
    fn prop_normalize_total(raw in proptest::collection::vec(any::<f64>(), 0..8)) {
        if let Some(position) = normalize(&raw) {
            prop_assert!(position.lng.is_finite() && position.lat.is_finite());
        }
    }
}
