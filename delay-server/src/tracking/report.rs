//! Structured delay reports.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{DelayDetail, DelayTrend, PositionSnapshot, Timetable, TrainNumber, add_minutes};
use crate::simrail::SimRailFeed;

use super::estimator::{DelayEstimator, estimate_delay, locate_current_entry};
use super::trend::DelayTrendTracker;

/// Build a delay report from already-fetched inputs.
///
/// The next entry is the one after the located current entry; before the
/// train has reached any entry, that is the first one. The trend is left
/// `Stable` for the caller to fill in.
pub fn build_detail(
    timetable: &Timetable,
    position: &PositionSnapshot,
    now: DateTime<Utc>,
) -> Option<DelayDetail> {
    if timetable.is_empty() {
        return None;
    }

    let delay = estimate_delay(timetable, Some(position), now);
    let current_idx = locate_current_entry(timetable, position, now);
    let current = current_idx.and_then(|idx| timetable.get(idx));
    let next = timetable.get(current_idx.map_or(0, |idx| idx + 1));

    let scheduled_arrival = next.and_then(|e| e.arrival_time);
    let scheduled_departure = next.and_then(|e| e.departure_time);

    Some(DelayDetail {
        current_delay_minutes: delay.minutes,
        current_station: current
            .map(|e| e.station_name.clone())
            .or_else(|| position.current_station_hint.clone()),
        next_station: next
            .map(|e| e.station_name.clone())
            .or_else(|| position.next_station_hint.clone()),
        scheduled_arrival,
        scheduled_departure,
        estimated_arrival: scheduled_arrival.map(|t| add_minutes(t, delay.minutes)),
        estimated_departure: scheduled_departure.map(|t| add_minutes(t, delay.minutes)),
        delay_trend: DelayTrend::Stable,
    })
}

/// Produces delay reports and keeps the trend history up to date.
pub struct DelayReporter<F> {
    estimator: Arc<DelayEstimator<F>>,
    trends: Arc<DelayTrendTracker>,
}

impl<F: SimRailFeed> DelayReporter<F> {
    pub fn new(estimator: Arc<DelayEstimator<F>>, trends: Arc<DelayTrendTracker>) -> Self {
        Self { estimator, trends }
    }

    /// Delay report for `train`, or `None` if it has no timetable or is not
    /// running.
    pub async fn delay_details(&self, train: &TrainNumber) -> Option<DelayDetail> {
        self.delay_details_at(train, Utc::now()).await
    }

    /// Delay report measured against a fixed clock.
    pub async fn delay_details_at(
        &self,
        train: &TrainNumber,
        now: DateTime<Utc>,
    ) -> Option<DelayDetail> {
        let (timetable, position) = self.estimator.fetch_inputs(train).await;
        let mut detail = build_detail(&timetable, position.as_ref()?, now)?;

        detail.delay_trend = self
            .trends
            .record(train, now, detail.current_delay_minutes)
            .await;
        Some(detail)
    }
}
