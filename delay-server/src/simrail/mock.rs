//! Mock SimRail feed for testing without network access.
//!
//! Serves stations, trains and timetables from memory. Data can be loaded
//! from JSON files in the upstream wire format or set directly by tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;

use crate::domain::{LiveTrain, Station, Timetable, TrainNumber};

use super::convert::{stations_from_json, timetable_from_json, trains_from_json};
use super::error::SimRailError;
use super::feed::SimRailFeed;

#[derive(Default)]
struct MockState {
    stations: RwLock<Vec<Station>>,
    trains: RwLock<Vec<LiveTrain>>,
    timetables: RwLock<HashMap<TrainNumber, Timetable>>,
    latency: RwLock<Option<Duration>>,
    fail_stations: AtomicBool,
    fail_trains: AtomicBool,
    fail_timetables: AtomicBool,
    station_fetches: AtomicUsize,
    train_fetches: AtomicUsize,
    timetable_fetches: AtomicUsize,
}

/// Mock SimRail feed that serves in-memory data.
///
/// Clones share state, so a test can keep a handle and change the data
/// while the code under test holds another.
#[derive(Clone, Default)]
pub struct MockSimRailClient {
    state: Arc<MockState>,
}

impl MockSimRailClient {
    /// Create an empty mock feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a mock feed from a directory.
    ///
    /// Expects `stations.json`, `trains.json` and a `timetables/` directory
    /// with files named `{train}.json`. Missing files leave that feed empty.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, SimRailError> {
        let loaded = load_dir(data_dir.as_ref())?;

        let state = MockState {
            stations: RwLock::new(loaded.stations),
            trains: RwLock::new(loaded.trains),
            timetables: RwLock::new(loaded.timetables),
            ..MockState::default()
        };
        Ok(Self {
            state: Arc::new(state),
        })
    }

    /// Reload mock data from disk (useful for development).
    pub async fn reload(&self, data_dir: impl AsRef<Path>) -> Result<(), SimRailError> {
        let loaded = load_dir(data_dir.as_ref())?;
        *self.state.stations.write().await = loaded.stations;
        *self.state.trains.write().await = loaded.trains;
        *self.state.timetables.write().await = loaded.timetables;
        Ok(())
    }

    pub async fn set_stations(&self, stations: Vec<Station>) {
        *self.state.stations.write().await = stations;
    }

    pub async fn set_trains(&self, trains: Vec<LiveTrain>) {
        *self.state.trains.write().await = trains;
    }

    pub async fn set_timetable(&self, train: TrainNumber, timetable: Timetable) {
        self.state.timetables.write().await.insert(train, timetable);
    }

    /// Delay every fetch by `latency`.
    pub async fn set_latency(&self, latency: Option<Duration>) {
        *self.state.latency.write().await = latency;
    }

    pub fn fail_stations(&self, fail: bool) {
        self.state.fail_stations.store(fail, Ordering::SeqCst);
    }

    pub fn fail_trains(&self, fail: bool) {
        self.state.fail_trains.store(fail, Ordering::SeqCst);
    }

    pub fn fail_timetables(&self, fail: bool) {
        self.state.fail_timetables.store(fail, Ordering::SeqCst);
    }

    /// Number of station directory fetches served so far.
    pub fn station_fetches(&self) -> usize {
        self.state.station_fetches.load(Ordering::SeqCst)
    }

    pub fn train_fetches(&self) -> usize {
        self.state.train_fetches.load(Ordering::SeqCst)
    }

    pub fn timetable_fetches(&self) -> usize {
        self.state.timetable_fetches.load(Ordering::SeqCst)
    }

    async fn simulate(&self, counter: &AtomicUsize, fail: &AtomicBool) -> Result<(), SimRailError> {
        counter.fetch_add(1, Ordering::SeqCst);

        let latency = *self.state.latency.read().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if fail.load(Ordering::SeqCst) {
            return Err(SimRailError::Api {
                status: 503,
                message: "mock feed unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl SimRailFeed for MockSimRailClient {
    async fn fetch_stations(&self) -> Result<Vec<Station>, SimRailError> {
        self.simulate(&self.state.station_fetches, &self.state.fail_stations)
            .await?;
        Ok(self.state.stations.read().await.clone())
    }

    async fn fetch_trains(&self) -> Result<Vec<LiveTrain>, SimRailError> {
        self.simulate(&self.state.train_fetches, &self.state.fail_trains)
            .await?;
        Ok(self.state.trains.read().await.clone())
    }

    async fn fetch_timetable(&self, train: &TrainNumber) -> Result<Timetable, SimRailError> {
        self.simulate(&self.state.timetable_fetches, &self.state.fail_timetables)
            .await?;
        // Upstream answers unknown trains with an empty list.
        Ok(self
            .state
            .timetables
            .read()
            .await
            .get(train)
            .cloned()
            .unwrap_or_default())
    }
}

struct LoadedData {
    stations: Vec<Station>,
    trains: Vec<LiveTrain>,
    timetables: HashMap<TrainNumber, Timetable>,
}

fn load_dir(data_dir: &Path) -> Result<LoadedData, SimRailError> {
    if !data_dir.is_dir() {
        return Err(SimRailError::Api {
            status: 0,
            message: format!("Mock data directory not found: {:?}", data_dir),
        });
    }

    let stations = match read_optional(&data_dir.join("stations.json"))? {
        Some(body) => stations_from_json(&body).map_err(|e| parse_error("stations.json", e))?,
        None => Vec::new(),
    };

    let trains = match read_optional(&data_dir.join("trains.json"))? {
        Some(body) => trains_from_json(&body).map_err(|e| parse_error("trains.json", e))?,
        None => Vec::new(),
    };

    let mut timetables = HashMap::new();
    let timetable_dir = data_dir.join("timetables");
    if timetable_dir.is_dir() {
        let entries = std::fs::read_dir(&timetable_dir).map_err(|e| SimRailError::Api {
            status: 0,
            message: format!("Failed to read {:?}: {}", timetable_dir, e),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| SimRailError::Api {
                status: 0,
                message: format!("Failed to read directory entry: {}", e),
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let train = TrainNumber::parse(stem).map_err(|e| SimRailError::Api {
                status: 0,
                message: format!("Invalid train number in filename {:?}: {}", path, e),
            })?;

            let body = std::fs::read_to_string(&path).map_err(|e| SimRailError::Api {
                status: 0,
                message: format!("Failed to read {:?}: {}", path, e),
            })?;

            let timetable = timetable_from_json(&body).map_err(|e| parse_error(stem, e))?;
            timetables.insert(train, timetable);
        }
    }

    Ok(LoadedData {
        stations,
        trains,
        timetables,
    })
}

fn read_optional(path: &Path) -> Result<Option<String>, SimRailError> {
    if !path.exists() {
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|e| SimRailError::Api {
            status: 0,
            message: format!("Failed to read {:?}: {}", path, e),
        })
}

fn parse_error(file: &str, e: serde_json::Error) -> SimRailError {
    SimRailError::Json {
        message: format!("{file}: {e}"),
        body: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn train(s: &str) -> TrainNumber {
        TrainNumber::parse(s).unwrap()
    }

    #[tokio::test]
    async fn load_mock_data() {
        let client = MockSimRailClient::from_dir("data/mock").unwrap();

        let stations = client.fetch_stations().await.unwrap();
        assert!(stations.iter().any(|s| s.name == "Katowice"));

        let trains = client.fetch_trains().await.unwrap();
        assert_eq!(trains.len(), 3);
        assert!(trains.iter().any(|t| t.train_number.as_str() == "14120"));

        let timetable = client.fetch_timetable(&train("14120")).await.unwrap();
        assert_eq!(timetable.len(), 4);
        assert_eq!(timetable.get(3).unwrap().station_name, "Zawiercie");
    }

    #[tokio::test]
    async fn pascal_case_timetable_file() {
        let client = MockSimRailClient::from_dir("data/mock").unwrap();
        let timetable = client.fetch_timetable(&train("4130")).await.unwrap();
        assert_eq!(timetable.len(), 3);
        assert_eq!(timetable.get(0).unwrap().station_name, "Katowice");
    }

    #[tokio::test]
    async fn unknown_train_has_empty_timetable() {
        let client = MockSimRailClient::from_dir("data/mock").unwrap();
        let timetable = client.fetch_timetable(&train("99999")).await.unwrap();
        assert!(timetable.is_empty());
    }

    #[test]
    fn missing_dir_is_an_error() {
        assert!(MockSimRailClient::from_dir("data/does-not-exist").is_err());
    }

    #[tokio::test]
    async fn partial_dir_loads_what_exists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("stations.json"),
            r#"[{"Name": "Katowice", "Latititude": 50.2578, "Longitude": 19.0172}]"#,
        )
        .unwrap();

        let client = MockSimRailClient::from_dir(dir.path()).unwrap();
        assert_eq!(client.fetch_stations().await.unwrap().len(), 1);
        assert!(client.fetch_trains().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reload_replaces_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stations.json");
        std::fs::write(&path, r#"[{"Name": "A", "lat": 50.0, "lng": 19.0}]"#).unwrap();

        let client = MockSimRailClient::from_dir(dir.path()).unwrap();
        assert_eq!(client.fetch_stations().await.unwrap()[0].name, "A");

        std::fs::write(&path, r#"[{"Name": "B", "lat": 50.0, "lng": 19.0}]"#).unwrap();
        client.reload(dir.path()).await.unwrap();
        assert_eq!(client.fetch_stations().await.unwrap()[0].name, "B");
    }

    #[tokio::test]
    async fn failures_and_counters() {
        let client = MockSimRailClient::new();
        client.fail_trains(true);

        assert!(client.fetch_trains().await.is_err());
        assert!(client.fetch_stations().await.unwrap().is_empty());
        assert_eq!(client.train_fetches(), 1);
        assert_eq!(client.station_fetches(), 1);
        assert_eq!(client.timetable_fetches(), 0);

        client.fail_trains(false);
        assert!(client.fetch_trains().await.is_ok());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let client = MockSimRailClient::new();
        let handle = client.clone();
        handle
            .set_stations(vec![Station::new("Katowice", 50.2578, 19.0172)])
            .await;

        assert_eq!(client.fetch_stations().await.unwrap().len(), 1);
        assert_eq!(handle.station_fetches(), 1);
    }

    #[tokio::test]
    async fn latency_delays_fetches() {
        let client = MockSimRailClient::new();
        client.set_latency(Some(Duration::from_millis(30))).await;

        let start = Instant::now();
        client.fetch_stations().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
