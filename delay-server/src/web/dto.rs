//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    DelayDetail, DelayEstimate, LiveTrain, PositionSnapshot, Station, StationSnapshot, Timetable,
    TimetableEntry, TrainNumber,
};
use crate::stations::NearestStation;

/// Query for the nearest-station lookup.
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub lat: f64,
    pub lng: f64,

    /// Match radius in meters (defaults to the configured radius)
    #[serde(rename = "maxDistance")]
    pub max_distance: Option<f64>,
}

/// Query for the train list.
#[derive(Debug, Deserialize)]
pub struct TrainSearchRequest {
    /// Case-insensitive filter on number, terminal stations or route
    pub q: Option<String>,
}

/// A station in the directory listing.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Station> for StationResult {
    fn from(station: &Station) -> Self {
        Self {
            name: station.name.clone(),
            latitude: station.coordinates.latitude,
            longitude: station.coordinates.longitude,
        }
    }
}

/// The full station directory.
#[derive(Debug, Serialize)]
pub struct StationListResponse {
    pub count: usize,
    pub fetched_at: DateTime<Utc>,
    pub stations: Vec<StationResult>,
}

impl From<&StationSnapshot> for StationListResponse {
    fn from(snapshot: &StationSnapshot) -> Self {
        Self {
            count: snapshot.len(),
            fetched_at: snapshot.fetched_at(),
            stations: snapshot.stations().iter().map(StationResult::from).collect(),
        }
    }
}

/// Result of a nearest-station lookup.
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub name: String,
    pub distance_m: f64,
}

impl From<NearestStation> for ResolveResponse {
    fn from(found: NearestStation) -> Self {
        Self {
            name: found.name,
            distance_m: found.distance_m,
        }
    }
}

/// A train on the live roster.
#[derive(Debug, Serialize)]
pub struct TrainResult {
    pub train_number: String,
    pub train_name: String,

    /// Category prefix of the train number (e.g. "EIP")
    pub train_type: String,

    pub route: String,
    pub start_station: String,
    pub end_station: String,
    pub current_station: Option<String>,
    pub next_station: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed_kmh: f64,
    pub signal: Option<String>,
    pub controlled_by_player: bool,
}

impl From<&LiveTrain> for TrainResult {
    fn from(train: &LiveTrain) -> Self {
        Self {
            train_number: train.train_number.to_string(),
            train_name: train.train_name.clone(),
            train_type: train.train_number.train_type(),
            route: train.route(),
            start_station: train.start_station.clone(),
            end_station: train.end_station.clone(),
            current_station: train.current_station.clone(),
            next_station: train.next_station.clone(),
            latitude: train.coordinates.map(|c| c.latitude),
            longitude: train.coordinates.map(|c| c.longitude),
            speed_kmh: train.speed_kmh,
            signal: train.signal_state.clone(),
            controlled_by_player: train.controlled_by_player,
        }
    }
}

/// Trains matching a search.
#[derive(Debug, Serialize)]
pub struct TrainListResponse {
    pub count: usize,
    pub trains: Vec<TrainResult>,
}

impl TrainListResponse {
    pub fn from_trains(trains: &[LiveTrain]) -> Self {
        Self {
            count: trains.len(),
            trains: trains.iter().map(TrainResult::from).collect(),
        }
    }
}

/// One timetable point.
#[derive(Debug, Serialize)]
pub struct TimetableEntryResult {
    pub station_name: String,
    pub station_category: String,
    pub arrival_time: Option<DateTime<Utc>>,
    pub departure_time: Option<DateTime<Utc>>,
    pub platform: Option<String>,
    pub track: Option<String>,
    pub stop_type: Option<&'static str>,
    pub is_stop: bool,
    pub max_speed: Option<u32>,
    pub mileage: Option<f64>,
}

impl From<&TimetableEntry> for TimetableEntryResult {
    fn from(entry: &TimetableEntry) -> Self {
        Self {
            station_name: entry.station_name.clone(),
            station_category: entry.station_category.clone(),
            arrival_time: entry.arrival_time,
            departure_time: entry.departure_time,
            platform: entry.platform.clone(),
            track: entry.track.clone(),
            stop_type: entry.stop_type.map(|t| t.as_str()),
            is_stop: entry.is_stop(),
            max_speed: entry.max_speed,
            mileage: entry.mileage,
        }
    }
}

/// A train's timetable.
#[derive(Debug, Serialize)]
pub struct TimetableResponse {
    pub train_number: String,
    pub count: usize,

    /// Scheduled run time from first to last entry
    pub scheduled_journey_minutes: i64,

    pub entries: Vec<TimetableEntryResult>,
}

impl TimetableResponse {
    pub fn from_timetable(train: &TrainNumber, timetable: &Timetable) -> Self {
        Self {
            train_number: train.to_string(),
            count: timetable.len(),
            scheduled_journey_minutes: timetable.scheduled_journey_minutes(),
            entries: timetable
                .entries()
                .iter()
                .map(TimetableEntryResult::from)
                .collect(),
        }
    }
}

/// A train's live position.
#[derive(Debug, Serialize)]
pub struct PositionResponse {
    pub train_number: String,
    pub current_station: Option<String>,

    /// How the station name was found: "feed", "nearest" or "coordinates"
    pub station_source: Option<&'static str>,

    pub next_station: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed_kmh: f64,
    pub signal: Option<String>,
}

impl From<&PositionSnapshot> for PositionResponse {
    fn from(position: &PositionSnapshot) -> Self {
        Self {
            train_number: position.train_number.to_string(),
            current_station: position.current_station_hint.clone(),
            station_source: position.station_source.map(|s| s.as_str()),
            next_station: position.next_station_hint.clone(),
            latitude: position.coordinates.map(|c| c.latitude),
            longitude: position.coordinates.map(|c| c.longitude),
            speed_kmh: position.speed_kmh,
            signal: position.signal_state.clone(),
        }
    }
}

/// A train's current delay.
#[derive(Debug, Serialize)]
pub struct DelayResponse {
    pub train_number: String,
    pub delay_minutes: u32,
    pub is_delayed: bool,
}

impl DelayResponse {
    pub fn from_estimate(train: &TrainNumber, estimate: DelayEstimate) -> Self {
        Self {
            train_number: train.to_string(),
            delay_minutes: estimate.minutes,
            is_delayed: estimate.is_delayed(),
        }
    }
}

/// Full delay report; times refer to the next station.
#[derive(Debug, Serialize)]
pub struct DelayDetailResponse {
    pub train_number: String,
    pub current_delay_minutes: u32,
    pub current_station: Option<String>,
    pub next_station: Option<String>,
    pub scheduled_arrival: Option<DateTime<Utc>>,
    pub scheduled_departure: Option<DateTime<Utc>>,
    pub estimated_arrival: Option<DateTime<Utc>>,
    pub estimated_departure: Option<DateTime<Utc>>,
    pub delay_trend: &'static str,
}

impl DelayDetailResponse {
    pub fn from_detail(train: &TrainNumber, detail: &DelayDetail) -> Self {
        Self {
            train_number: train.to_string(),
            current_delay_minutes: detail.current_delay_minutes,
            current_station: detail.current_station.clone(),
            next_station: detail.next_station.clone(),
            scheduled_arrival: detail.scheduled_arrival,
            scheduled_departure: detail.scheduled_departure,
            estimated_arrival: detail.estimated_arrival,
            estimated_departure: detail.estimated_departure,
            delay_trend: detail.delay_trend.as_str(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
