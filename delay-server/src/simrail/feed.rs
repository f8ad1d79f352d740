//! The upstream data seam.

use std::future::Future;

use crate::domain::{LiveTrain, Station, Timetable, TrainNumber};

use super::error::SimRailError;

/// The three SimRail feeds the tracker consumes.
///
/// Implementations return normalized domain types; raw upstream shapes stay
/// behind this trait. `SimRailClient` talks to the real API and
/// `MockSimRailClient` serves canned data.
pub trait SimRailFeed: Send + Sync + 'static {
    /// Full station directory for the configured server.
    fn fetch_stations(&self) -> impl Future<Output = Result<Vec<Station>, SimRailError>> + Send;

    /// Roster of trains currently running on the configured server.
    fn fetch_trains(&self) -> impl Future<Output = Result<Vec<LiveTrain>, SimRailError>> + Send;

    /// Planned stop sequence for one train.
    fn fetch_timetable(
        &self,
        train: &TrainNumber,
    ) -> impl Future<Output = Result<Timetable, SimRailError>> + Send;
}
