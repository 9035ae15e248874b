//! Geographic distance math.
//!
//! Provides the great-circle distance between two coordinates, used by the
//! geofence monitor to decide whether a subordinate has left its
//! supervisor's radius.

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude/longitude degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Mean Earth radius in meters.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters.
///
/// Uses the haversine formula. Inputs are degrees; no range validation is
/// performed. NaN or out-of-range inputs yield NaN, which compares false
/// against any radius, so callers degrade to "no breach".
#[inline]
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = Coordinate::new(40.7128, -74.0060);
        assert!(distance_meters(p, p).abs() < 1e-9);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinate::new(53.5, 10.0);
        let b = Coordinate::new(53.6, 10.1);
        let ab = distance_meters(a, b);
        let ba = distance_meters(b, a);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // One degree of latitude is ~111.2 km everywhere on the sphere
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let d = distance_meters(a, b);
        assert!((d - 111_195.0).abs() < 100.0, "got {} m", d);
    }

    #[test]
    fn test_known_city_pair() {
        // New York (JFK) to Los Angeles (LAX): ~3,974 km great-circle
        let jfk = Coordinate::new(40.6413, -73.7781);
        let lax = Coordinate::new(33.9416, -118.4085);
        let d = distance_meters(jfk, lax);
        assert!((d - 3_974_000.0).abs() < 10_000.0, "got {} m", d);
    }

    #[test]
    fn test_small_offset_near_equator() {
        // 0.001 degrees of latitude is ~111 m
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.001, 0.0);
        let d = distance_meters(a, b);
        assert!((d - 111.2).abs() < 1.0, "got {} m", d);
    }

    #[test]
    fn test_nan_input_degrades_to_nan() {
        let a = Coordinate::new(f64::NAN, 0.0);
        let b = Coordinate::new(0.0, 0.0);
        let d = distance_meters(a, b);
        assert!(d.is_nan());
        // NaN compares false against any radius, so no breach fires
        assert!(!(d >= 100.0));
    }

    #[test]
    fn test_antipodal_points() {
        // Half the Earth's circumference, ~20,015 km
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let d = distance_meters(a, b);
        assert!((d - 20_015_000.0).abs() < 10_000.0, "got {} m", d);
    }
}
