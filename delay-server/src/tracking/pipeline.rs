//! Wiring for the tracking components.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    Coordinates, DelayDetail, DelayEstimate, LiveTrain, PositionSnapshot, StationSnapshot,
    Timetable, TrainNumber,
};
use crate::simrail::SimRailFeed;
use crate::stations::{DirectoryError, GeoResolver, NearestStation, StationDirectory};

use super::config::TrackingConfig;
use super::estimator::DelayEstimator;
use super::position::PositionFetcher;
use super::report::DelayReporter;
use super::timetable::TimetableFetcher;
use super::trend::DelayTrendTracker;

/// Every tracking operation over one shared feed.
///
/// The station directory and the trend history live as long as the
/// pipeline; everything else is fetched per call.
pub struct DelayPipeline<F> {
    feed: Arc<F>,
    directory: Arc<StationDirectory<F>>,
    resolver: Arc<GeoResolver<F>>,
    timetables: Arc<TimetableFetcher<F>>,
    positions: Arc<PositionFetcher<F>>,
    estimator: Arc<DelayEstimator<F>>,
    reporter: DelayReporter<F>,
}

impl<F: SimRailFeed> DelayPipeline<F> {
    pub fn new(feed: F, config: &TrackingConfig) -> Self {
        Self::from_shared(Arc::new(feed), config)
    }

    /// Build over a shared feed. Out-of-range settings fall back to their
    /// defaults.
    pub fn from_shared(feed: Arc<F>, config: &TrackingConfig) -> Self {
        let config = config.clone().validated();
        let directory = Arc::new(StationDirectory::new(
            Arc::clone(&feed),
            config.station_ttl(),
        ));
        let resolver = Arc::new(GeoResolver::new(
            Arc::clone(&directory),
            config.max_match_distance_m,
        ));
        let timetables = Arc::new(TimetableFetcher::new(Arc::clone(&feed)));
        let positions = Arc::new(PositionFetcher::new(
            Arc::clone(&feed),
            Arc::clone(&resolver),
            Arc::clone(&timetables),
        ));
        let estimator = Arc::new(DelayEstimator::new(
            Arc::clone(&timetables),
            Arc::clone(&positions),
        ));
        let trends = Arc::new(DelayTrendTracker::new(
            config.trend_window(),
            config.trend_threshold_minutes,
        ));
        let reporter = DelayReporter::new(Arc::clone(&estimator), trends);

        Self {
            feed,
            directory,
            resolver,
            timetables,
            positions,
            estimator,
            reporter,
        }
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub async fn stations(&self) -> Result<Arc<StationSnapshot>, DirectoryError> {
        self.directory.stations().await
    }

    /// Nearest station within `max_distance_m`, or the configured radius.
    pub async fn resolve(
        &self,
        point: &Coordinates,
        max_distance_m: Option<f64>,
    ) -> Option<NearestStation> {
        let max = max_distance_m.unwrap_or_else(|| self.resolver.default_max_distance_m());
        self.resolver.resolve(point, max).await
    }

    pub async fn fetch_timetable(&self, train: &TrainNumber) -> Timetable {
        self.timetables.fetch_timetable(train).await
    }

    pub async fn get_position(&self, train: &TrainNumber) -> Option<PositionSnapshot> {
        self.positions.get_position(train).await
    }

    pub async fn active_trains(&self, query: Option<&str>) -> Vec<LiveTrain> {
        self.positions.active_trains(query).await
    }

    pub async fn calculate_delay(&self, train: &TrainNumber) -> DelayEstimate {
        self.estimator.calculate_delay(train).await
    }

    pub async fn calculate_delay_at(&self, train: &TrainNumber, now: DateTime<Utc>) -> DelayEstimate {
        self.estimator.calculate_delay_at(train, now).await
    }

    pub async fn delay_details(&self, train: &TrainNumber) -> Option<DelayDetail> {
        self.reporter.delay_details(train).await
    }

    pub async fn delay_details_at(
        &self,
        train: &TrainNumber,
        now: DateTime<Utc>,
    ) -> Option<DelayDetail> {
        self.reporter.delay_details_at(train, now).await
    }
}
