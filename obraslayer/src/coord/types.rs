//! Coordinate type definitions

use std::fmt;

/// Latitude band of the target region (Santiago de Cali and its rural area).
pub const REGION_MIN_LAT: f64 = 3.0;
pub const REGION_MAX_LAT: f64 = 4.0;

/// Longitude band of the target region.
pub const REGION_MIN_LNG: f64 = -77.0;
pub const REGION_MAX_LNG: f64 = -76.0;

/// A geographic position in GeoJSON order (longitude first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLat {
    /// Longitude in decimal degrees
    pub lng: f64,
    /// Latitude in decimal degrees
    pub lat: f64,
}

impl LngLat {
    /// Creates a position from longitude and latitude.
    #[inline]
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Returns the position as a GeoJSON `[lng, lat]` pair.
    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Returns true if the position falls inside the given region bands.
    pub fn in_region(&self, bounds: &RegionBounds) -> bool {
        bounds.contains_lat(self.lat) && bounds.contains_lng(self.lng)
    }
}

impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lng, self.lat)
    }
}

/// Latitude/longitude bands used by the regional sanity check.
///
/// The bands decide whether a raw pair is already `(lat, lng)`, already
/// `(lng, lat)`, or unknown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl RegionBounds {
    /// Bands for Santiago de Cali, the region every known dataset covers.
    pub const CALI: RegionBounds = RegionBounds {
        min_lat: REGION_MIN_LAT,
        max_lat: REGION_MAX_LAT,
        min_lng: REGION_MIN_LNG,
        max_lng: REGION_MAX_LNG,
    };

    #[inline]
    pub fn contains_lat(&self, value: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&value)
    }

    #[inline]
    pub fn contains_lng(&self, value: f64) -> bool {
        (self.min_lng..=self.max_lng).contains(&value)
    }
}

impl Default for RegionBounds {
    fn default() -> Self {
        Self::CALI
    }
}
