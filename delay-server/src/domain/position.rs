//! Live train state.

use super::{Coordinates, TrainNumber};

/// A train on the live roster, normalized from the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveTrain {
    pub train_number: TrainNumber,
    pub train_name: String,
    pub start_station: String,
    pub end_station: String,
    /// Station name reported by the feed itself, if any.
    pub current_station: Option<String>,
    /// Next-station hint reported by the feed itself, if any.
    pub next_station: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub speed_kmh: f64,
    /// Aspect or identifier of the signal ahead.
    pub signal_state: Option<String>,
    /// Whether a player is currently driving this train.
    pub controlled_by_player: bool,
}

impl LiveTrain {
    pub fn new(train_number: TrainNumber) -> Self {
        Self {
            train_number,
            train_name: String::new(),
            start_station: String::new(),
            end_station: String::new(),
            current_station: None,
            next_station: None,
            coordinates: None,
            speed_kmh: 0.0,
            signal_state: None,
            controlled_by_player: false,
        }
    }

    /// Route label in the form `"{start} → {end}"`.
    pub fn route(&self) -> String {
        format!("{} → {}", self.start_station, self.end_station)
    }

    /// Case-insensitive match against number, terminal stations or route.
    ///
    /// A blank query matches every train.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        self.train_number.as_str().to_lowercase().contains(&query)
            || self.start_station.to_lowercase().contains(&query)
            || self.end_station.to_lowercase().contains(&query)
            || self.route().to_lowercase().contains(&query)
    }
}

/// Which strategy produced a position's station name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationSource {
    /// Named directly by the live feed.
    Feed,
    /// Nearest directory station to the train's coordinates.
    Nearest,
    /// Raw coordinates formatted for display.
    Coordinates,
}

impl StationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationSource::Feed => "feed",
            StationSource::Nearest => "nearest",
            StationSource::Coordinates => "coordinates",
        }
    }
}

/// Point-in-time position of one train.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSnapshot {
    pub train_number: TrainNumber,
    /// Resolved current station name, or a `"GPS: ..."` string.
    pub current_station_hint: Option<String>,
    pub station_source: Option<StationSource>,
    pub next_station_hint: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub speed_kmh: f64,
    pub signal_state: Option<String>,
}

impl PositionSnapshot {
    /// A snapshot carrying only a named current station.
    pub fn at_station(train_number: TrainNumber, station: impl Into<String>) -> Self {
        Self {
            train_number,
            current_station_hint: Some(station.into()),
            station_source: Some(StationSource::Feed),
            next_station_hint: None,
            coordinates: None,
            speed_kmh: 0.0,
            signal_state: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train() -> LiveTrain {
        let mut t = LiveTrain::new(TrainNumber::parse("RJ 1021").unwrap());
        t.start_station = "Praha hl.n.".to_string();
        t.end_station = "Brno hl.n.".to_string();
        t
    }

    #[test]
    fn route_label() {
        assert_eq!(train().route(), "Praha hl.n. → Brno hl.n.");
    }

    #[test]
    fn query_matches_number_and_stations() {
        let t = train();
        assert!(t.matches_query(""));
        assert!(t.matches_query("  "));
        assert!(t.matches_query("rj 10"));
        assert!(t.matches_query("PRAHA"));
        assert!(t.matches_query("brno"));
        assert!(t.matches_query("hl.n. → brno"));
        assert!(!t.matches_query("Ostrava"));
    }
}
