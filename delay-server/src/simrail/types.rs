//! SimRail API response DTOs.
//!
//! These types map directly to the upstream JSON. The feeds are inconsistent
//! about naming: the same value may arrive as PascalCase, camelCase, or with
//! upstream typos (`Latititude`, `Latititute`, `Longitute`). Each variant
//! gets its own field here; `convert` merges them in a fixed order.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A list payload, either wrapped as `{ "result": true, "data": [...] }` or
/// sent as a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(default = "Vec::new")]
        data: Vec<T>,
    },
}

impl<T> Envelope<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Envelope::Bare(items) => items,
            Envelope::Wrapped { data } => data,
        }
    }
}

/// Entry from `stations-open`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStation {
    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub name_pascal: Option<String>,
    #[serde(rename = "name", default, deserialize_with = "lenient_string")]
    pub name_camel: Option<String>,

    /// Upstream spelling of latitude.
    #[serde(rename = "Latititude", default, deserialize_with = "lenient_f64")]
    pub latititude: Option<f64>,
    #[serde(rename = "Latitude", default, deserialize_with = "lenient_f64")]
    pub latitude_pascal: Option<f64>,
    #[serde(rename = "latitude", default, deserialize_with = "lenient_f64")]
    pub latitude_camel: Option<f64>,
    #[serde(rename = "lat", default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,

    #[serde(rename = "Longitude", default, deserialize_with = "lenient_f64")]
    pub longitude_pascal: Option<f64>,
    #[serde(rename = "longitude", default, deserialize_with = "lenient_f64")]
    pub longitude_camel: Option<f64>,
    #[serde(rename = "lng", default, deserialize_with = "lenient_f64")]
    pub lng: Option<f64>,
}

/// Entry from `trains-open`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrain {
    #[serde(rename = "TrainNoLocal", default, deserialize_with = "lenient_string")]
    pub train_no_local: Option<String>,
    #[serde(rename = "trainNumber", default, deserialize_with = "lenient_string")]
    pub train_number: Option<String>,

    #[serde(rename = "TrainName", default, deserialize_with = "lenient_string")]
    pub train_name_pascal: Option<String>,
    #[serde(rename = "trainName", default, deserialize_with = "lenient_string")]
    pub train_name_camel: Option<String>,

    #[serde(rename = "StartStation", default, deserialize_with = "lenient_string")]
    pub start_station_pascal: Option<String>,
    #[serde(rename = "startStation", default, deserialize_with = "lenient_string")]
    pub start_station_camel: Option<String>,

    #[serde(rename = "EndStation", default, deserialize_with = "lenient_string")]
    pub end_station_pascal: Option<String>,
    #[serde(rename = "endStation", default, deserialize_with = "lenient_string")]
    pub end_station_camel: Option<String>,

    #[serde(rename = "CurrentStation", default, deserialize_with = "lenient_string")]
    pub current_station_pascal: Option<String>,
    #[serde(rename = "currentStation", default, deserialize_with = "lenient_string")]
    pub current_station_camel: Option<String>,

    #[serde(rename = "NextStation", default, deserialize_with = "lenient_string")]
    pub next_station_pascal: Option<String>,
    #[serde(rename = "nextStation", default, deserialize_with = "lenient_string")]
    pub next_station_camel: Option<String>,

    #[serde(rename = "TrainData", default)]
    pub train_data: Option<RawTrainData>,

    #[serde(rename = "lat", default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(rename = "lng", default, deserialize_with = "lenient_f64")]
    pub lng: Option<f64>,
    #[serde(rename = "speed", default, deserialize_with = "lenient_f64")]
    pub speed: Option<f64>,
    #[serde(rename = "signal", default, deserialize_with = "lenient_string")]
    pub signal: Option<String>,
}

/// Nested live state of a roster entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrainData {
    #[serde(rename = "Velocity", default, deserialize_with = "lenient_f64")]
    pub velocity: Option<f64>,

    #[serde(rename = "SignalInFront", default, deserialize_with = "lenient_string")]
    pub signal_in_front: Option<String>,

    /// Upstream spelling of latitude.
    #[serde(rename = "Latititute", default, deserialize_with = "lenient_f64")]
    pub latititute: Option<f64>,
    #[serde(rename = "Latitude", default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,

    /// Upstream spelling of longitude.
    #[serde(rename = "Longitute", default, deserialize_with = "lenient_f64")]
    pub longitute: Option<f64>,
    #[serde(rename = "Longitude", default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,

    #[serde(rename = "ControlledBySteamId", default, deserialize_with = "lenient_string")]
    pub controlled_by_steam_id: Option<String>,
}

/// Response from `getAllTimetables`.
///
/// The endpoint returns one object per train with a nested `timetable`, but
/// older deployments returned the entries directly.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTimetableResponse {
    Trains(Vec<RawTrainTimetable>),
    Entries(Vec<RawTimetableEntry>),
}

/// One train object from `getAllTimetables`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrainTimetable {
    #[serde(alias = "Timetable")]
    pub timetable: Vec<RawTimetableEntry>,
}

/// A single timetable point.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTimetableEntry {
    #[serde(rename = "nameForPerson", default, deserialize_with = "lenient_string")]
    pub name_for_person: Option<String>,
    #[serde(rename = "nameOfPoint", default, deserialize_with = "lenient_string")]
    pub name_of_point: Option<String>,
    #[serde(rename = "stationName", default, deserialize_with = "lenient_string")]
    pub station_name_camel: Option<String>,
    #[serde(rename = "StationName", default, deserialize_with = "lenient_string")]
    pub station_name_pascal: Option<String>,

    #[serde(rename = "stationCategory", default, deserialize_with = "lenient_string")]
    pub station_category_camel: Option<String>,
    #[serde(rename = "StationCategory", default, deserialize_with = "lenient_string")]
    pub station_category_pascal: Option<String>,

    #[serde(rename = "arrivalTime", default, deserialize_with = "lenient_string")]
    pub arrival_time_camel: Option<String>,
    #[serde(rename = "ArrivalTime", default, deserialize_with = "lenient_string")]
    pub arrival_time_pascal: Option<String>,

    #[serde(rename = "departureTime", default, deserialize_with = "lenient_string")]
    pub departure_time_camel: Option<String>,
    #[serde(rename = "DepartureTime", default, deserialize_with = "lenient_string")]
    pub departure_time_pascal: Option<String>,

    #[serde(rename = "platform", default, deserialize_with = "lenient_string")]
    pub platform_camel: Option<String>,
    #[serde(rename = "Platform", default, deserialize_with = "lenient_string")]
    pub platform_pascal: Option<String>,

    #[serde(rename = "track", default, deserialize_with = "lenient_string")]
    pub track_camel: Option<String>,
    #[serde(rename = "Track", default, deserialize_with = "lenient_string")]
    pub track_pascal: Option<String>,

    #[serde(rename = "stopType", default, deserialize_with = "lenient_string")]
    pub stop_type_camel: Option<String>,
    #[serde(rename = "StopType", default, deserialize_with = "lenient_string")]
    pub stop_type_pascal: Option<String>,

    #[serde(rename = "maxSpeed", default, deserialize_with = "lenient_f64")]
    pub max_speed_camel: Option<f64>,
    #[serde(rename = "MaxSpeed", default, deserialize_with = "lenient_f64")]
    pub max_speed_pascal: Option<f64>,

    #[serde(rename = "mileage", default, deserialize_with = "lenient_f64")]
    pub mileage_camel: Option<f64>,
    #[serde(rename = "Mileage", default, deserialize_with = "lenient_f64")]
    pub mileage_pascal: Option<f64>,

    #[serde(rename = "supervisedBy", default, deserialize_with = "lenient_string")]
    pub supervised_by_camel: Option<String>,
    #[serde(rename = "SupervisedBy", default, deserialize_with = "lenient_string")]
    pub supervised_by_pascal: Option<String>,
}

/// Accept a string or a number; anything else (including `null`) is absent.
/// Blank strings are treated as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accept a number or a numeric string; anything else is absent.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
