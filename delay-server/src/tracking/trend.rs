//! Rolling per-train delay history.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use moka::future::Cache as MokaCache;
use tokio::sync::Mutex;

use crate::domain::{DelayTrend, TrainNumber};
use crate::stations::MAX_EXPIRY;

/// Samples kept per train, regardless of window length.
const MAX_SAMPLES: usize = 32;

/// Upper bound on trains tracked at once.
const MAX_TRACKED_TRAINS: u64 = 10_000;

#[derive(Debug, Clone, Copy)]
struct Observation {
    at: DateTime<Utc>,
    minutes: u32,
}

type Window = Arc<Mutex<VecDeque<Observation>>>;

/// Classify a change in delay.
///
/// A rise of at least `threshold` minutes is worsening, a fall of at least
/// `threshold` is improving. A zero threshold is treated as one.
pub fn classify(previous: u32, current: u32, threshold: u32) -> DelayTrend {
    let diff = i64::from(current) - i64::from(previous);
    let threshold = i64::from(threshold.max(1));

    if diff >= threshold {
        DelayTrend::Worsening
    } else if diff <= -threshold {
        DelayTrend::Improving
    } else {
        DelayTrend::Stable
    }
}

/// Tracks recent delay observations to report a trend.
///
/// Each train's window is dropped once it goes unused for the window length.
pub struct DelayTrendTracker {
    windows: MokaCache<TrainNumber, Window>,
    window: Duration,
    threshold_minutes: u32,
}

impl DelayTrendTracker {
    pub fn new(window: Duration, threshold_minutes: u32) -> Self {
        let idle = window
            .to_std()
            .unwrap_or_default()
            .clamp(StdDuration::from_secs(1), MAX_EXPIRY);

        let windows = MokaCache::builder()
            .max_capacity(MAX_TRACKED_TRAINS)
            .time_to_idle(idle)
            .build();

        Self {
            windows,
            window,
            threshold_minutes,
        }
    }

    /// Record a delay for `train` and report the trend against the oldest
    /// observation still inside the window.
    pub async fn record(&self, train: &TrainNumber, at: DateTime<Utc>, minutes: u32) -> DelayTrend {
        let window = self
            .windows
            .get_with(train.clone(), async { Arc::new(Mutex::new(VecDeque::new())) })
            .await;
        let mut samples = window.lock().await;

        if let Some(cutoff) = at.checked_sub_signed(self.window) {
            while samples.front().is_some_and(|o| o.at < cutoff) {
                samples.pop_front();
            }
        }

        let trend = match samples.front() {
            Some(oldest) => classify(oldest.minutes, minutes, self.threshold_minutes),
            None => DelayTrend::Stable,
        };

        samples.push_back(Observation { at, minutes });
        while samples.len() > MAX_SAMPLES {
            samples.pop_front();
        }

        trend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(m: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 10, 0, 0).unwrap() + Duration::minutes(m)
    }

    fn train(s: &str) -> TrainNumber {
        TrainNumber::parse(s).unwrap()
    }

    fn tracker() -> DelayTrendTracker {
        DelayTrendTracker::new(Duration::minutes(10), 1)
    }

    #[test]
    fn classify_thresholds() {
        assert_eq!(classify(5, 6, 1), DelayTrend::Worsening);
        assert_eq!(classify(6, 5, 1), DelayTrend::Improving);
        assert_eq!(classify(5, 5, 1), DelayTrend::Stable);
        assert_eq!(classify(5, 6, 2), DelayTrend::Stable);
        assert_eq!(classify(5, 3, 2), DelayTrend::Improving);
        assert_eq!(classify(0, 1, 0), DelayTrend::Worsening);
    }

    #[tokio::test]
    async fn oversized_window_still_builds() {
        let tracker = DelayTrendTracker::new(Duration::days(2_000 * 365), 1);
        let t = train("14120");

        tracker.record(&t, at(0), 3).await;
        assert_eq!(tracker.record(&t, at(1), 5).await, DelayTrend::Worsening);
    }

    #[tokio::test]
    async fn first_observation_is_stable() {
        assert_eq!(tracker().record(&train("1"), at(0), 12).await, DelayTrend::Stable);
    }

    #[tokio::test]
    async fn worsening_and_improving() {
        let tracker = tracker();
        let t = train("14120");

        tracker.record(&t, at(0), 3).await;
        assert_eq!(tracker.record(&t, at(1), 5).await, DelayTrend::Worsening);

        let t = train("4130");
        tracker.record(&t, at(0), 8).await;
        assert_eq!(tracker.record(&t, at(2), 6).await, DelayTrend::Improving);
    }

    #[tokio::test]
    async fn compares_with_oldest_in_window() {
        let tracker = tracker();
        let t = train("1");

        tracker.record(&t, at(0), 4).await;
        tracker.record(&t, at(3), 9).await;
        // Back down to 4: equal to the oldest sample, not the latest.
        assert_eq!(tracker.record(&t, at(5), 4).await, DelayTrend::Stable);
    }

    #[tokio::test]
    async fn old_samples_leave_the_window() {
        let tracker = tracker();
        let t = train("1");

        tracker.record(&t, at(0), 2).await;
        assert_eq!(tracker.record(&t, at(11), 9).await, DelayTrend::Stable);
        assert_eq!(tracker.record(&t, at(12), 9).await, DelayTrend::Stable);
    }

    #[tokio::test]
    async fn trains_are_tracked_separately() {
        let tracker = tracker();

        tracker.record(&train("1"), at(0), 0).await;
        assert_eq!(tracker.record(&train("2"), at(1), 20).await, DelayTrend::Stable);
    }

    #[tokio::test]
    async fn sample_count_is_capped() {
        let tracker = tracker();
        let t = train("1");

        for _ in 0..(MAX_SAMPLES + 8) {
            tracker.record(&t, at(0), 1).await;
        }

        let window = tracker.windows.get(&t).await.unwrap();
        assert_eq!(window.lock().await.len(), MAX_SAMPLES);
    }
}
