//! Timetable types.
//!
//! A `Timetable` is the planned stop sequence of one train run, in route
//! order. Entries are immutable once fetched.

use chrono::{DateTime, Utc};

/// How a train treats a timetable point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopType {
    /// Passengers board and alight.
    Commercial,
    /// Operational stop only.
    NonCommercial,
    /// No stop; the train passes through.
    Technical,
}

impl StopType {
    /// Parse the upstream stop type.
    ///
    /// Accepts both the canonical upper-case names and the SimRail
    /// vocabulary (`CommercialStop`, `NoncommercialStop`, `NoStopOver`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "COMMERCIAL" | "CommercialStop" | "Commercial" => Some(StopType::Commercial),
            "NON_COMMERCIAL" | "NoncommercialStop" | "NonCommercialStop" | "NonCommercial" => {
                Some(StopType::NonCommercial)
            }
            "TECHNICAL" | "NoStopOver" | "Technical" => Some(StopType::Technical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StopType::Commercial => "COMMERCIAL",
            StopType::NonCommercial => "NON_COMMERCIAL",
            StopType::Technical => "TECHNICAL",
        }
    }
}

/// One scheduled point on a train's route.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableEntry {
    pub station_name: String,
    pub station_category: String,
    pub arrival_time: Option<DateTime<Utc>>,
    pub departure_time: Option<DateTime<Utc>>,
    pub platform: Option<String>,
    pub track: Option<String>,
    pub stop_type: Option<StopType>,
    pub max_speed: Option<u32>,
    pub mileage: Option<f64>,
    pub supervised_by: Option<String>,
}

impl TimetableEntry {
    /// Creates an entry with only a station name set.
    pub fn new(station_name: impl Into<String>) -> Self {
        Self {
            station_name: station_name.into(),
            station_category: String::new(),
            arrival_time: None,
            departure_time: None,
            platform: None,
            track: None,
            stop_type: None,
            max_speed: None,
            mileage: None,
            supervised_by: None,
        }
    }

    /// Whether the train actually halts here.
    ///
    /// A stop needs both an arrival and a departure and must not be a
    /// technical point. Everything else is treated as a pass-through.
    pub fn is_stop(&self) -> bool {
        self.arrival_time.is_some()
            && self.departure_time.is_some()
            && self.stop_type != Some(StopType::Technical)
    }

    /// The scheduled time delay is measured against at this entry.
    ///
    /// Stops prefer departure; pass-throughs prefer arrival.
    pub fn reference_time(&self) -> Option<DateTime<Utc>> {
        if self.is_stop() {
            self.departure_time.or(self.arrival_time)
        } else {
            self.arrival_time.or(self.departure_time)
        }
    }

    /// The time at which the train is due to reach this entry.
    pub fn reached_at(&self) -> Option<DateTime<Utc>> {
        self.arrival_time.or(self.departure_time)
    }
}

/// The ordered stop sequence of a single train run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timetable {
    entries: Vec<TimetableEntry>,
}

impl Timetable {
    pub fn new(entries: Vec<TimetableEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TimetableEntry] {
        &self.entries
    }

    pub fn get(&self, idx: usize) -> Option<&TimetableEntry> {
        self.entries.get(idx)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the first entry with exactly this station name.
    pub fn position_of(&self, station_name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.station_name == station_name)
    }

    /// Station name of the entry following `idx`, if any.
    pub fn next_station_after(&self, idx: usize) -> Option<&str> {
        self.entries
            .get(idx + 1)
            .map(|e| e.station_name.as_str())
    }

    /// Scheduled duration of the whole run in minutes.
    ///
    /// Measured from the first entry's departure (or arrival) to the last
    /// entry's arrival (or departure). Zero for fewer than two entries or
    /// when either end lacks a time.
    pub fn scheduled_journey_minutes(&self) -> i64 {
        if self.entries.len() < 2 {
            return 0;
        }

        let first = &self.entries[0];
        let last = &self.entries[self.entries.len() - 1];

        match (
            first.departure_time.or(first.arrival_time),
            last.arrival_time.or(last.departure_time),
        ) {
            (Some(start), Some(end)) => end.signed_duration_since(start).num_minutes(),
            _ => 0,
        }
    }
}

impl From<Vec<TimetableEntry>> for Timetable {
    fn from(entries: Vec<TimetableEntry>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
    }

    fn entry(name: &str, arr: Option<(u32, u32)>, dep: Option<(u32, u32)>) -> TimetableEntry {
        let mut e = TimetableEntry::new(name);
        e.arrival_time = arr.map(|(h, m)| at(h, m));
        e.departure_time = dep.map(|(h, m)| at(h, m));
        e
    }

    #[test]
    fn stop_type_parsing() {
        assert_eq!(StopType::parse("COMMERCIAL"), Some(StopType::Commercial));
        assert_eq!(StopType::parse("CommercialStop"), Some(StopType::Commercial));
        assert_eq!(
            StopType::parse("NoncommercialStop"),
            Some(StopType::NonCommercial)
        );
        assert_eq!(StopType::parse("NON_COMMERCIAL"), Some(StopType::NonCommercial));
        assert_eq!(StopType::parse("NoStopOver"), Some(StopType::Technical));
        assert_eq!(StopType::parse("TECHNICAL"), Some(StopType::Technical));
        assert_eq!(StopType::parse("whatever"), None);
    }

    #[test]
    fn stop_needs_both_times() {
        assert!(entry("A", Some((9, 58)), Some((10, 0))).is_stop());
        assert!(!entry("A", None, Some((10, 0))).is_stop());
        assert!(!entry("A", Some((9, 58)), None).is_stop());
    }

    #[test]
    fn technical_is_never_a_stop() {
        let mut e = entry("A", Some((9, 58)), Some((10, 0)));
        e.stop_type = Some(StopType::Technical);
        assert!(!e.is_stop());
    }

    #[test]
    fn reference_time_for_stop_prefers_departure() {
        let e = entry("A", Some((9, 58)), Some((10, 0)));
        assert_eq!(e.reference_time(), Some(at(10, 0)));
    }

    #[test]
    fn reference_time_for_pass_through_prefers_arrival() {
        let mut e = entry("A", Some((9, 58)), Some((10, 0)));
        e.stop_type = Some(StopType::Technical);
        assert_eq!(e.reference_time(), Some(at(9, 58)));

        let e = entry("B", None, Some((10, 5)));
        assert_eq!(e.reference_time(), Some(at(10, 5)));

        let e = entry("C", None, None);
        assert_eq!(e.reference_time(), None);
    }

    #[test]
    fn position_of_takes_first_match() {
        let tt = Timetable::new(vec![
            entry("A", None, Some((10, 0))),
            entry("B", Some((10, 10)), Some((10, 11))),
            entry("A", Some((10, 30)), None),
        ]);
        assert_eq!(tt.position_of("A"), Some(0));
        assert_eq!(tt.position_of("B"), Some(1));
        assert_eq!(tt.position_of("Z"), None);
        assert_eq!(tt.next_station_after(0), Some("B"));
        assert_eq!(tt.next_station_after(2), None);
    }

    #[test]
    fn journey_minutes() {
        let tt = Timetable::new(vec![
            entry("A", None, Some((10, 0))),
            entry("B", Some((10, 10)), Some((10, 11))),
            entry("C", Some((11, 30)), None),
        ]);
        assert_eq!(tt.scheduled_journey_minutes(), 90);
    }

    #[test]
    fn journey_minutes_degenerate() {
        assert_eq!(Timetable::default().scheduled_journey_minutes(), 0);
        let single = Timetable::new(vec![entry("A", None, Some((10, 0)))]);
        assert_eq!(single.scheduled_journey_minutes(), 0);
        let untimed = Timetable::new(vec![entry("A", None, None), entry("B", None, None)]);
        assert_eq!(untimed.scheduled_journey_minutes(), 0);
    }
}
