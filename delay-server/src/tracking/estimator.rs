//! Delay estimation from schedule and live position.
//!
//! The feed reports no delay directly. We find which timetable entry the
//! train is at (or last passed) and compare its scheduled time with the
//! clock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join;
use tracing::debug;

use crate::domain::{
    DelayEstimate, PositionSnapshot, Timetable, TrainNumber, rounded_minutes_since,
};
use crate::simrail::SimRailFeed;

use super::position::PositionFetcher;
use super::timetable::TimetableFetcher;

/// Index of the timetable entry the train is currently at.
///
/// An exact match on the resolved station name wins. Otherwise falls back
/// to [`locate_by_time`].
pub fn locate_current_entry(
    timetable: &Timetable,
    position: &PositionSnapshot,
    now: DateTime<Utc>,
) -> Option<usize> {
    position
        .current_station_hint
        .as_deref()
        .and_then(|name| timetable.position_of(name))
        .or_else(|| locate_by_time(timetable, now))
}

/// Heuristic position: the last entry the train was due to reach by `now`.
///
/// Uses each entry's arrival, or its departure when there is no arrival.
/// This is a guess from the schedule alone, so a late train is placed
/// further along than it really is. `None` if no entry is due yet.
pub fn locate_by_time(timetable: &Timetable, now: DateTime<Utc>) -> Option<usize> {
    timetable
        .entries()
        .iter()
        .rposition(|e| e.reached_at().is_some_and(|t| t <= now))
}

/// Current delay of a train, in whole minutes, never negative.
///
/// Zero when there is no timetable, no position, no located entry or no
/// scheduled time at that entry.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use delay_server::domain::{PositionSnapshot, Timetable, TimetableEntry, TrainNumber};
/// use delay_server::tracking::estimate_delay;
///
/// let mut x = TimetableEntry::new("X");
/// x.arrival_time = Some(Utc.with_ymd_and_hms(2026, 1, 10, 9, 58, 0).unwrap());
/// x.departure_time = Some(Utc.with_ymd_and_hms(2026, 1, 10, 10, 0, 0).unwrap());
/// let timetable = Timetable::new(vec![x]);
///
/// let position = PositionSnapshot::at_station(TrainNumber::parse("1").unwrap(), "X");
/// let now = Utc.with_ymd_and_hms(2026, 1, 10, 10, 5, 0).unwrap();
///
/// assert_eq!(estimate_delay(&timetable, Some(&position), now).minutes, 5);
/// ```
pub fn estimate_delay(
    timetable: &Timetable,
    position: Option<&PositionSnapshot>,
    now: DateTime<Utc>,
) -> DelayEstimate {
    let Some(position) = position else {
        return DelayEstimate::ON_TIME;
    };

    locate_current_entry(timetable, position, now)
        .and_then(|idx| timetable.get(idx))
        .and_then(|entry| entry.reference_time())
        .map(|reference| DelayEstimate::from_signed_minutes(rounded_minutes_since(now, reference)))
        .unwrap_or(DelayEstimate::ON_TIME)
}

/// Computes delays for live trains.
pub struct DelayEstimator<F> {
    timetables: Arc<TimetableFetcher<F>>,
    positions: Arc<PositionFetcher<F>>,
}

impl<F: SimRailFeed> DelayEstimator<F> {
    pub fn new(timetables: Arc<TimetableFetcher<F>>, positions: Arc<PositionFetcher<F>>) -> Self {
        Self {
            timetables,
            positions,
        }
    }

    /// Fetch timetable and position for `train` concurrently.
    ///
    /// The position is built from the fetched timetable, so the timetable is
    /// requested once.
    pub async fn fetch_inputs(
        &self,
        train: &TrainNumber,
    ) -> (Timetable, Option<PositionSnapshot>) {
        let (timetable, live) = join(
            self.timetables.fetch_timetable(train),
            self.positions.find_live_train(train),
        )
        .await;

        let position = match live {
            Some(live) => Some(self.positions.position_from(live, Some(&timetable)).await),
            None => None,
        };

        (timetable, position)
    }

    /// Current delay of `train`.
    pub async fn calculate_delay(&self, train: &TrainNumber) -> DelayEstimate {
        self.calculate_delay_at(train, Utc::now()).await
    }

    /// Delay of `train` measured against a fixed clock.
    pub async fn calculate_delay_at(&self, train: &TrainNumber, now: DateTime<Utc>) -> DelayEstimate {
        let (timetable, position) = self.fetch_inputs(train).await;
        let estimate = estimate_delay(&timetable, position.as_ref(), now);
        debug!(%train, minutes = estimate.minutes, "estimated delay");
        estimate
    }
}
