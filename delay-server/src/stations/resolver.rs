//! Nearest-station lookup over the cached directory.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{Coordinates, Station};
use crate::simrail::SimRailFeed;

use super::directory::StationDirectory;

/// Default match radius in meters.
pub const DEFAULT_MAX_DISTANCE_M: f64 = 5_000.0;

/// A station matched to a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestStation {
    pub name: String,
    /// Great-circle distance from the query point.
    pub distance_m: f64,
}

/// Whether `meters` is usable as a match radius.
pub fn valid_radius(meters: f64) -> bool {
    meters.is_finite() && meters >= 0.0
}

/// Find the station closest to `point`, if it lies within `max_distance_m`.
///
/// Ties go to the earlier station in `stations`. A NaN radius matches nothing.
///
/// # Examples
///
/// ```
/// use delay_server::domain::{Coordinates, Station};
/// use delay_server::stations::nearest_station;
///
/// let stations = vec![Station::new("A", 0.0, 0.0), Station::new("B", 0.0, 0.1)];
/// let point = Coordinates::new(0.0, 0.001);
///
/// assert_eq!(nearest_station(&stations, &point, 5_000.0).unwrap().name, "A");
/// assert!(nearest_station(&stations, &point, 10.0).is_none());
/// ```
pub fn nearest_station(
    stations: &[Station],
    point: &Coordinates,
    max_distance_m: f64,
) -> Option<NearestStation> {
    let mut best: Option<(&Station, f64)> = None;

    for station in stations {
        let distance = point.distance_to(&station.coordinates);
        if !distance.is_finite() {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((station, distance)),
        }
    }

    let (station, distance_m) = best?;
    if max_distance_m.is_nan() || distance_m > max_distance_m {
        return None;
    }

    Some(NearestStation {
        name: station.name.clone(),
        distance_m,
    })
}

/// Resolves coordinates to station names using the shared directory.
///
/// Never fails: an unavailable directory is logged and treated as "no match".
pub struct GeoResolver<F> {
    directory: Arc<StationDirectory<F>>,
    default_max_distance_m: f64,
}

impl<F: SimRailFeed> GeoResolver<F> {
    pub fn new(directory: Arc<StationDirectory<F>>, default_max_distance_m: f64) -> Self {
        Self {
            directory,
            default_max_distance_m,
        }
    }

    pub fn default_max_distance_m(&self) -> f64 {
        self.default_max_distance_m
    }

    /// Nearest station within `max_distance_m` of `point`.
    pub async fn resolve(&self, point: &Coordinates, max_distance_m: f64) -> Option<NearestStation> {
        if !point.is_valid() {
            debug!(%point, "not resolving invalid coordinates");
            return None;
        }

        let snapshot = match self.directory.stations().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "station lookup unavailable");
                return None;
            }
        };

        nearest_station(snapshot.stations(), point, max_distance_m)
    }

    /// Nearest station within the default radius.
    pub async fn nearest(&self, point: &Coordinates) -> Option<NearestStation> {
        self.resolve(point, self.default_max_distance_m).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simrail::MockSimRailClient;
    use crate::stations::directory::DEFAULT_STATION_TTL;
    use proptest::prelude::*;

    fn a_and_b() -> Vec<Station> {
        vec![Station::new("A", 0.0, 0.0), Station::new("B", 0.0, 0.1)]
    }

    async fn resolver(stations: Vec<Station>) -> (Arc<MockSimRailClient>, GeoResolver<MockSimRailClient>) {
        let feed = MockSimRailClient::new();
        feed.set_stations(stations).await;
        let feed = Arc::new(feed);
        let directory = Arc::new(StationDirectory::new(Arc::clone(&feed), DEFAULT_STATION_TTL));
        (feed, GeoResolver::new(directory, DEFAULT_MAX_DISTANCE_M))
    }

    #[test]
    fn picks_nearest_within_radius() {
        let point = Coordinates::new(0.0, 0.001);

        let found = nearest_station(&a_and_b(), &point, 5_000.0).unwrap();
        assert_eq!(found.name, "A");
        assert!((found.distance_m - 111.2).abs() < 1.0);

        assert!(nearest_station(&a_and_b(), &point, 10.0).is_none());
    }

    #[test]
    fn ties_go_to_first() {
        let stations = vec![Station::new("West", 0.0, -0.01), Station::new("East", 0.0, 0.01)];
        let found = nearest_station(&stations, &Coordinates::new(0.0, 0.0), 5_000.0).unwrap();
        assert_eq!(found.name, "West");
    }

    #[test]
    fn empty_directory_has_no_match() {
        assert!(nearest_station(&[], &Coordinates::new(50.0, 19.0), 5_000.0).is_none());
    }

    #[test]
    fn unusable_radius_matches_nothing() {
        let far = vec![Station::new("Far", 10.0, 10.0)];
        let origin = Coordinates::new(0.0, 0.0);

        assert!(nearest_station(&far, &origin, f64::NAN).is_none());
        assert!(nearest_station(&far, &origin, -1.0).is_none());
        assert!(nearest_station(&far, &origin, f64::INFINITY).is_some());
    }

    #[test]
    fn radius_validity() {
        assert!(valid_radius(0.0));
        assert!(valid_radius(5_000.0));
        assert!(!valid_radius(-1.0));
        assert!(!valid_radius(f64::NAN));
        assert!(!valid_radius(f64::INFINITY));
    }

    #[tokio::test]
    async fn resolve_uses_directory() {
        let (_, resolver) = resolver(a_and_b()).await;

        let found = resolver.nearest(&Coordinates::new(0.0, 0.099)).await.unwrap();
        assert_eq!(found.name, "B");

        assert!(resolver.resolve(&Coordinates::new(0.0, 0.05), 10.0).await.is_none());
    }

    #[tokio::test]
    async fn resolve_swallows_directory_errors() {
        let (feed, resolver) = resolver(a_and_b()).await;
        feed.fail_stations(true);

        assert!(resolver.nearest(&Coordinates::new(0.0, 0.0)).await.is_none());
    }

    #[tokio::test]
    async fn resolve_rejects_invalid_coordinates() {
        let (feed, resolver) = resolver(a_and_b()).await;

        assert!(resolver.nearest(&Coordinates::new(91.0, 0.0)).await.is_none());
        assert_eq!(feed.station_fetches(), 0);
    }

    fn arb_station() -> impl Strategy<Value = Station> {
        (-60.0f64..60.0, -170.0f64..170.0).prop_map(|(lat, lng)| Station::new("S", lat, lng))
    }

    proptest! {
        #[test]
        fn result_is_minimum_within_max(
            stations in prop::collection::vec(arb_station(), 0..20),
            lat in -60.0f64..60.0,
            lng in -170.0f64..170.0,
            max in 0.0f64..2_000_000.0,
        ) {
            let point = Coordinates::new(lat, lng);
            let min = stations
                .iter()
                .map(|s| point.distance_to(&s.coordinates))
                .fold(f64::INFINITY, f64::min);

            match nearest_station(&stations, &point, max) {
                Some(found) => {
                    prop_assert!(found.distance_m <= max);
                    prop_assert_eq!(found.distance_m, min);
                }
                None => prop_assert!(stations.is_empty() || min > max),
            }
        }
    }
}
