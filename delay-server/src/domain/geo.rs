//! Geographic coordinates and great-circle distance.

use std::fmt;

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns true if both components are finite and within their ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to `other` in meters.
    ///
    /// # Examples
    ///
    /// ```
    /// use delay_server::domain::Coordinates;
    ///
    /// let a = Coordinates::new(0.0, 0.0);
    /// let b = Coordinates::new(0.0, 0.1);
    /// let d = a.distance_to(&b);
    /// assert!((d - 11_119.5).abs() < 1.0);
    /// ```
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Haversine distance between two points given in degrees, in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_to_self() {
        let p = Coordinates::new(50.0614, 19.9366);
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn one_millidegree_at_equator() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 0.001);
        // 0.001 degrees of longitude at the equator is about 111.2 m
        let d = a.distance_to(&b);
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn krakow_to_warsaw() {
        let krakow = Coordinates::new(50.0670, 19.9470);
        let warsaw = Coordinates::new(52.2287, 21.0030);
        let d = krakow.distance_to(&warsaw);
        // Roughly 252 km as the crow flies
        assert!((d - 252_000.0).abs() < 5_000.0, "got {d}");
    }

    #[test]
    fn validity() {
        assert!(Coordinates::new(50.0, 19.0).is_valid());
        assert!(!Coordinates::new(91.0, 19.0).is_valid());
        assert!(!Coordinates::new(50.0, -181.0).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn display_four_decimals() {
        let p = Coordinates::new(50.123456, 19.987661);
        assert_eq!(p.to_string(), "50.1235, 19.9877");
    }
}
