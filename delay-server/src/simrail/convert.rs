//! Conversion from SimRail DTOs to domain types.
//!
//! Every upstream naming variant is resolved here, once, in a fixed order of
//! preference. Nothing outside `simrail` sees the raw shapes.

use tracing::{debug, warn};

use crate::domain::{
    Coordinates, LiveTrain, Station, StopType, Timetable, TimetableEntry, TrainNumber,
    parse_timestamp,
};

use super::types::{
    Envelope, RawStation, RawTimetableEntry, RawTimetableResponse, RawTrain, RawTrainData,
};

/// Decode and normalize a `stations-open` body.
pub fn stations_from_json(body: &str) -> Result<Vec<Station>, serde_json::Error> {
    let envelope: Envelope<RawStation> = serde_json::from_str(body)?;
    Ok(convert_stations(envelope.into_items()))
}

/// Decode and normalize a `trains-open` body.
pub fn trains_from_json(body: &str) -> Result<Vec<LiveTrain>, serde_json::Error> {
    let envelope: Envelope<RawTrain> = serde_json::from_str(body)?;
    Ok(convert_trains(envelope.into_items()))
}

/// Decode and normalize a `getAllTimetables` body.
pub fn timetable_from_json(body: &str) -> Result<Timetable, serde_json::Error> {
    let response: RawTimetableResponse = serde_json::from_str(body)?;
    Ok(convert_timetable(response))
}

/// Convert directory entries, skipping any without a name or valid position.
pub fn convert_stations(raw: Vec<RawStation>) -> Vec<Station> {
    let total = raw.len();
    let stations: Vec<Station> = raw.into_iter().filter_map(convert_station).collect();

    if stations.len() < total {
        debug!(
            skipped = total - stations.len(),
            total, "skipped stations without name or coordinates"
        );
    }

    stations
}

fn convert_station(raw: RawStation) -> Option<Station> {
    let name = raw.name_pascal.or(raw.name_camel)?;
    let latitude = raw
        .latititude
        .or(raw.latitude_pascal)
        .or(raw.latitude_camel)
        .or(raw.lat)?;
    let longitude = raw
        .longitude_pascal
        .or(raw.longitude_camel)
        .or(raw.lng)?;

    let coordinates = Coordinates::new(latitude, longitude);
    if !coordinates.is_valid() {
        return None;
    }

    Some(Station { name, coordinates })
}

/// Convert roster entries, skipping any without a usable train number.
pub fn convert_trains(raw: Vec<RawTrain>) -> Vec<LiveTrain> {
    let mut trains = Vec::with_capacity(raw.len());

    for item in raw {
        let number = item
            .train_no_local
            .clone()
            .or_else(|| item.train_number.clone());

        match number.as_deref().map(TrainNumber::parse) {
            Some(Ok(train_number)) => trains.push(convert_train(train_number, item)),
            Some(Err(e)) => warn!(error = %e, "skipping roster entry"),
            None => warn!("skipping roster entry without train number"),
        }
    }

    trains
}

fn convert_train(train_number: TrainNumber, raw: RawTrain) -> LiveTrain {
    let data = raw.train_data.unwrap_or_default();
    let coordinates = train_coordinates(&data, raw.lat, raw.lng);

    LiveTrain {
        train_number,
        train_name: raw
            .train_name_pascal
            .or(raw.train_name_camel)
            .unwrap_or_default(),
        start_station: raw
            .start_station_pascal
            .or(raw.start_station_camel)
            .unwrap_or_else(|| "Unknown".to_string()),
        end_station: raw
            .end_station_pascal
            .or(raw.end_station_camel)
            .unwrap_or_else(|| "Unknown".to_string()),
        current_station: raw.current_station_pascal.or(raw.current_station_camel),
        next_station: raw.next_station_pascal.or(raw.next_station_camel),
        coordinates,
        speed_kmh: data.velocity.or(raw.speed).unwrap_or(0.0),
        signal_state: data.signal_in_front.or(raw.signal),
        controlled_by_player: data.controlled_by_steam_id.is_some(),
    }
}

/// Nested `TrainData` wins over the flat fallback fields.
fn train_coordinates(
    data: &RawTrainData,
    flat_lat: Option<f64>,
    flat_lng: Option<f64>,
) -> Option<Coordinates> {
    let latitude = data.latititute.or(data.latitude).or(flat_lat)?;
    let longitude = data.longitute.or(data.longitude).or(flat_lng)?;
    let coordinates = Coordinates::new(latitude, longitude);
    coordinates.is_valid().then_some(coordinates)
}

/// Flatten a timetable response into a single ordered timetable.
///
/// When the response holds several train objects, only the first is used:
/// the request is already filtered to one train number.
pub fn convert_timetable(response: RawTimetableResponse) -> Timetable {
    let entries = match response {
        RawTimetableResponse::Trains(trains) => trains
            .into_iter()
            .next()
            .map(|t| t.timetable)
            .unwrap_or_default(),
        RawTimetableResponse::Entries(entries) => entries,
    };

    Timetable::new(
        entries
            .into_iter()
            .filter_map(convert_timetable_entry)
            .collect(),
    )
}

fn convert_timetable_entry(raw: RawTimetableEntry) -> Option<TimetableEntry> {
    let station_name = raw
        .name_for_person
        .or(raw.name_of_point)
        .or(raw.station_name_camel)
        .or(raw.station_name_pascal)?;

    let arrival = raw.arrival_time_camel.or(raw.arrival_time_pascal);
    let departure = raw.departure_time_camel.or(raw.departure_time_pascal);

    Some(TimetableEntry {
        arrival_time: parse_optional_time(&station_name, arrival.as_deref()),
        departure_time: parse_optional_time(&station_name, departure.as_deref()),
        station_category: raw
            .station_category_camel
            .or(raw.station_category_pascal)
            .unwrap_or_default(),
        platform: raw.platform_camel.or(raw.platform_pascal),
        track: raw.track_camel.or(raw.track_pascal),
        stop_type: raw
            .stop_type_camel
            .or(raw.stop_type_pascal)
            .as_deref()
            .and_then(StopType::parse),
        max_speed: raw
            .max_speed_camel
            .or(raw.max_speed_pascal)
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.round() as u32),
        mileage: raw.mileage_camel.or(raw.mileage_pascal),
        supervised_by: raw.supervised_by_camel.or(raw.supervised_by_pascal),
        station_name,
    })
}

fn parse_optional_time(
    station_name: &str,
    value: Option<&str>,
) -> Option<chrono::DateTime<chrono::Utc>> {
    let value = value?;
    match parse_timestamp(value) {
        Ok(t) => Some(t),
        Err(e) => {
            debug!(station = station_name, value, error = %e, "ignoring timetable time");
            None
        }
    }
}
