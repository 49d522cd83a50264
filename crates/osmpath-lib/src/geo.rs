//! Geographic coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance(*self, *other)
    }
}

/// Haversine great-circle distance between two coordinates, in meters.
///
/// The same formula feeds edge weights, the A* heuristic, nearest-node
/// lookup, and path lengths, so the heuristic is an admissible lower bound
/// by construction.
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push `h` marginally outside [0, 1] for antipodal or
    // identical points; clamp before the inverse step.
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Meters per degree of latitude on the mean sphere.
    const METERS_PER_DEGREE: f64 = 111_194.926;

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(48.8566, 2.3522);
        let b = Coordinate::new(51.5074, -0.1278);
        assert_eq!(haversine_distance(a, b), haversine_distance(b, a));
    }

    #[test]
    fn distance_to_matches_the_free_function() {
        let a = Coordinate::new(48.8566, 2.3522);
        let b = Coordinate::new(51.5074, -0.1278);
        assert_eq!(a.distance_to(&b), haversine_distance(a, b));
    }

    #[test]
    fn identical_points_have_zero_distance() {
        let a = Coordinate::new(-33.8688, 151.2093);
        assert_eq!(haversine_distance(a, a), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_at_the_equator() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let distance = haversine_distance(a, b);
        assert!((distance - METERS_PER_DEGREE).abs() < 1.0, "got {distance}");
    }

    #[test]
    fn antipodal_points_stay_finite() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let distance = haversine_distance(a, b);
        assert!(distance.is_finite());
        // Half the mean circumference.
        assert!((distance - std::f64::consts::PI * 6_371_000.0).abs() < 1.0);
    }

    #[test]
    fn longitude_degrees_shrink_toward_the_poles() {
        let equator = haversine_distance(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        let arctic = haversine_distance(Coordinate::new(80.0, 0.0), Coordinate::new(80.0, 1.0));
        assert!(arctic < equator / 2.0);
    }
}
