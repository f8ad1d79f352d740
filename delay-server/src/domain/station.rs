//! Station reference data.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::Coordinates;

/// A station from the SimRail station directory.
///
/// The name is the station's identity within a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    pub coordinates: Coordinates,
}

impl Station {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            coordinates: Coordinates::new(latitude, longitude),
        }
    }
}

/// An immutable, timestamped set of stations.
///
/// Snapshots are replaced wholesale on refresh and never patched. Station
/// names are unique: when the source list repeats a name, the first
/// occurrence is kept.
#[derive(Debug, Clone)]
pub struct StationSnapshot {
    stations: Vec<Station>,
    fetched_at: DateTime<Utc>,
}

impl StationSnapshot {
    /// Build a snapshot from a station list, dropping duplicate names.
    pub fn new(stations: Vec<Station>, fetched_at: DateTime<Utc>) -> Self {
        let mut seen = HashSet::with_capacity(stations.len());
        let stations = stations
            .into_iter()
            .filter(|s| seen.insert(s.name.clone()))
            .collect();

        Self {
            stations,
            fetched_at,
        }
    }

    /// Stations in directory order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// When the snapshot was fetched from upstream.
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Look up a station by exact name.
    pub fn get(&self, name: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
