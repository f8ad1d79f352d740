//! Live position lookup.
//!
//! The roster names a station for some trains only. When it does not, the
//! station is resolved from the train's coordinates by walking an ordered
//! list of strategies until one produces a name.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{LiveTrain, PositionSnapshot, StationSource, Timetable, TrainNumber};
use crate::simrail::SimRailFeed;
use crate::stations::GeoResolver;

use super::timetable::TimetableFetcher;

/// One way of naming a train's current station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationStrategy {
    /// Use the station the feed itself reports.
    FeedHint,
    /// Nearest directory station within the match radius.
    NearestStation,
    /// Format the raw coordinates as `"GPS: {lat}, {lng}"`.
    RawCoordinates,
}

/// Feed hint, then nearest station, then raw GPS.
pub const DEFAULT_STRATEGIES: &[StationStrategy] = &[
    StationStrategy::FeedHint,
    StationStrategy::NearestStation,
    StationStrategy::RawCoordinates,
];

/// Looks up trains on the live roster and builds position snapshots.
pub struct PositionFetcher<F> {
    feed: Arc<F>,
    resolver: Arc<GeoResolver<F>>,
    timetables: Arc<TimetableFetcher<F>>,
    strategies: &'static [StationStrategy],
}

impl<F: SimRailFeed> PositionFetcher<F> {
    pub fn new(
        feed: Arc<F>,
        resolver: Arc<GeoResolver<F>>,
        timetables: Arc<TimetableFetcher<F>>,
    ) -> Self {
        Self {
            feed,
            resolver,
            timetables,
            strategies: DEFAULT_STRATEGIES,
        }
    }

    /// Replace the station-naming strategy chain.
    pub fn with_strategies(mut self, strategies: &'static [StationStrategy]) -> Self {
        self.strategies = strategies;
        self
    }

    /// The full live roster; empty if the feed is unavailable.
    pub async fn roster(&self) -> Vec<LiveTrain> {
        match self.feed.fetch_trains().await {
            Ok(trains) => trains,
            Err(e) => {
                warn!(error = %e, timeout = e.is_timeout(), "live roster unavailable");
                Vec::new()
            }
        }
    }

    /// Trains on the roster matching `query`, or all of them.
    pub async fn active_trains(&self, query: Option<&str>) -> Vec<LiveTrain> {
        let trains = self.roster().await;
        match query {
            Some(q) => trains.into_iter().filter(|t| t.matches_query(q)).collect(),
            None => trains,
        }
    }

    /// Roster entry for exactly this train number.
    pub async fn find_live_train(&self, train: &TrainNumber) -> Option<LiveTrain> {
        let found = self
            .roster()
            .await
            .into_iter()
            .find(|t| &t.train_number == train);

        if found.is_none() {
            debug!(%train, "train not on live roster");
        }
        found
    }

    /// Current position of `train`, or `None` if it is not running.
    pub async fn get_position(&self, train: &TrainNumber) -> Option<PositionSnapshot> {
        let live = self.find_live_train(train).await?;
        Some(self.position_from(live, None).await)
    }

    /// Build a snapshot for a roster entry.
    ///
    /// The timetable is only needed when the feed gives no next-station hint.
    /// Pass it in if the caller already has it; otherwise it is fetched on
    /// demand.
    pub async fn position_from(
        &self,
        live: LiveTrain,
        timetable: Option<&Timetable>,
    ) -> PositionSnapshot {
        let (current, source) = match self.resolve_station(&live).await {
            Some((name, source)) => (Some(name), Some(source)),
            None => (None, None),
        };

        let next = match (live.next_station.clone(), current.as_deref(), source) {
            (Some(hint), _, _) => Some(hint),
            // A GPS label never matches a timetable entry.
            (None, _, Some(StationSource::Coordinates)) | (None, None, _) => None,
            (None, Some(name), _) => match timetable {
                Some(timetable) => next_after(timetable, name),
                None => {
                    let fetched = self.timetables.fetch_timetable(&live.train_number).await;
                    next_after(&fetched, name)
                }
            },
        };

        PositionSnapshot {
            train_number: live.train_number,
            current_station_hint: current,
            station_source: source,
            next_station_hint: next,
            coordinates: live.coordinates,
            speed_kmh: live.speed_kmh,
            signal_state: live.signal_state,
        }
    }

    async fn resolve_station(&self, live: &LiveTrain) -> Option<(String, StationSource)> {
        for strategy in self.strategies {
            let resolved = match strategy {
                StationStrategy::FeedHint => live
                    .current_station
                    .clone()
                    .map(|name| (name, StationSource::Feed)),
                StationStrategy::NearestStation => match &live.coordinates {
                    Some(point) => self
                        .resolver
                        .nearest(point)
                        .await
                        .map(|found| (found.name, StationSource::Nearest)),
                    None => None,
                },
                StationStrategy::RawCoordinates => live
                    .coordinates
                    .map(|point| (format!("GPS: {point}"), StationSource::Coordinates)),
            };

            if resolved.is_some() {
                return resolved;
            }
        }
        None
    }
}

fn next_after(timetable: &Timetable, station: &str) -> Option<String> {
    timetable
        .position_of(station)
        .and_then(|idx| timetable.next_station_after(idx))
        .map(str::to_string)
}
