//! Tuning for the tracking pipeline.

use std::time::Duration as StdDuration;

use chrono::Duration;
use tracing::warn;

use crate::stations::{MAX_EXPIRY, valid_radius};

const MAX_EXPIRY_SECS: u64 = MAX_EXPIRY.as_secs();

/// Configuration parameters for position and delay tracking.
#[derive(Debug, Clone)]
pub struct TrackingConfig {
    /// How long a station directory snapshot stays fresh (seconds).
    pub station_ttl_secs: u64,

    /// Maximum distance for matching coordinates to a station (meters).
    /// Points further than this from every station fall back to raw GPS.
    pub max_match_distance_m: f64,

    /// How far back delay observations count towards the trend (minutes).
    pub trend_window_mins: i64,

    /// Minimum change in delay (minutes) reported as a trend.
    pub trend_threshold_minutes: u32,
}

impl TrackingConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        station_ttl_secs: u64,
        max_match_distance_m: f64,
        trend_window_mins: i64,
        trend_threshold_minutes: u32,
    ) -> Self {
        Self {
            station_ttl_secs,
            max_match_distance_m,
            trend_window_mins,
            trend_threshold_minutes,
        }
    }

    /// Replace every out-of-range field with its default, logging each one.
    pub fn validated(self) -> Self {
        let defaults = Self::default();
        let mut config = self;

        if config.station_ttl_secs == 0 || config.station_ttl_secs > MAX_EXPIRY_SECS {
            warn!(value = config.station_ttl_secs, "station TTL out of range, using default");
            config.station_ttl_secs = defaults.station_ttl_secs;
        }
        if !valid_radius(config.max_match_distance_m) {
            warn!(value = config.max_match_distance_m, "match radius out of range, using default");
            config.max_match_distance_m = defaults.max_match_distance_m;
        }
        if window_minutes(config.trend_window_mins).is_none() {
            warn!(value = config.trend_window_mins, "trend window out of range, using default");
            config.trend_window_mins = defaults.trend_window_mins;
        }

        config
    }

    /// Returns the station snapshot TTL as a Duration, capped at
    /// [`MAX_EXPIRY`].
    pub fn station_ttl(&self) -> StdDuration {
        StdDuration::from_secs(self.station_ttl_secs.min(MAX_EXPIRY_SECS))
    }

    /// Returns the trend window as a Duration; out-of-range values give the
    /// default window.
    pub fn trend_window(&self) -> Duration {
        window_minutes(self.trend_window_mins)
            .or_else(|| window_minutes(Self::default().trend_window_mins))
            .unwrap_or_default()
    }
}

fn window_minutes(mins: i64) -> Option<Duration> {
    Duration::try_minutes(mins)
        .filter(|w| *w > Duration::zero() && w.num_seconds() as u64 <= MAX_EXPIRY_SECS)
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            station_ttl_secs: 300, // 5 minutes
            max_match_distance_m: 5_000.0,
            trend_window_mins: 10,
            trend_threshold_minutes: 1,
        }
    }
}
