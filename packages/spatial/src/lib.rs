#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Great-circle distance between district anchor points.
//!
//! Points are [`geo::Point`] values with `x` = longitude and `y` =
//! latitude, in WGS84 degrees. Nothing is validated: callers pass real
//! coordinates, and NaN in means NaN out.

use geo::{Distance, HaversineMeasure, Point};

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

const EARTH_MILES: HaversineMeasure = HaversineMeasure::new(EARTH_RADIUS_MILES);

/// Haversine distance between two points, in statute miles.
///
/// Symmetric, non-negative, and zero for identical points.
#[must_use]
pub fn miles_between(a: Point<f64>, b: Point<f64>) -> f64 {
    EARTH_MILES.distance(a, b)
}

/// [`miles_between`] for `(lat, lon)` pairs.
#[must_use]
pub fn miles_between_coords(a: (f64, f64), b: (f64, f64)) -> f64 {
    miles_between(Point::new(a.1, a.0), Point::new(b.1, b.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOSTON: (f64, f64) = (42.3601, -71.0589);
    const WORCESTER: (f64, f64) = (42.2626, -71.8023);
    const SPRINGFIELD: (f64, f64) = (42.1015, -72.5898);

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn identical_points_are_zero() {
        assert!(miles_between_coords(BOSTON, BOSTON).abs() < 1e-9);
    }

    #[test]
    fn is_symmetric() {
        for (a, b) in [(BOSTON, WORCESTER), (WORCESTER, SPRINGFIELD), (BOSTON, SPRINGFIELD)] {
            assert!(close(
                miles_between_coords(a, b),
                miles_between_coords(b, a),
                1e-9
            ));
        }
    }

    #[test]
    fn boston_to_worcester_is_about_39_miles() {
        let d = miles_between_coords(BOSTON, WORCESTER);
        assert!(close(d, 38.8, 1.0), "got {d}");
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = miles_between_coords((0.0, 0.0), (1.0, 0.0));
        let expected = EARTH_RADIUS_MILES * 1f64.to_radians();
        assert!(close(d, expected, 1e-9), "got {d}");
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let d = miles_between_coords((0.0, 0.0), (0.0, 180.0));
        assert!(close(d, EARTH_RADIUS_MILES * std::f64::consts::PI, 1e-6));
    }

    #[test]
    fn nan_propagates() {
        assert!(miles_between_coords((f64::NAN, 0.0), BOSTON).is_nan());
    }

    #[test]
    fn point_order_is_lon_lat() {
        let via_points = miles_between(
            Point::new(BOSTON.1, BOSTON.0),
            Point::new(WORCESTER.1, WORCESTER.0),
        );
        assert!(close(via_points, miles_between_coords(BOSTON, WORCESTER), 1e-12));
    }
}
