//! Derived delay values.

use chrono::{DateTime, Utc};

/// Current delay in whole minutes.
///
/// Never negative: a train running early reports zero, the same as a train
/// on time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DelayEstimate {
    pub minutes: u32,
}

impl DelayEstimate {
    /// The "no delay / unknown" estimate.
    pub const ON_TIME: DelayEstimate = DelayEstimate { minutes: 0 };

    /// Clamp a signed minute difference into an estimate.
    ///
    /// # Examples
    ///
    /// ```
    /// use delay_server::domain::DelayEstimate;
    ///
    /// assert_eq!(DelayEstimate::from_signed_minutes(7).minutes, 7);
    /// assert_eq!(DelayEstimate::from_signed_minutes(-3).minutes, 0);
    /// ```
    pub fn from_signed_minutes(minutes: i64) -> Self {
        Self {
            minutes: minutes.clamp(0, i64::from(u32::MAX)) as u32,
        }
    }

    pub fn is_delayed(&self) -> bool {
        self.minutes > 0
    }
}

/// Direction of recent delay change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelayTrend {
    Improving,
    Worsening,
    Stable,
}

impl DelayTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            DelayTrend::Improving => "improving",
            DelayTrend::Worsening => "worsening",
            DelayTrend::Stable => "stable",
        }
    }
}

/// Delay report for display layers.
///
/// Scheduled and estimated times refer to the next station.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayDetail {
    pub current_delay_minutes: u32,
    pub current_station: Option<String>,
    pub next_station: Option<String>,
    pub scheduled_arrival: Option<DateTime<Utc>>,
    pub scheduled_departure: Option<DateTime<Utc>>,
    pub estimated_arrival: Option<DateTime<Utc>>,
    pub estimated_departure: Option<DateTime<Utc>>,
    pub delay_trend: DelayTrend,
}
