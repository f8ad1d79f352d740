//! Position and delay tracking for SimRail trains.
//!
//! # Data flow
//!
//! 1. `TimetableFetcher` and `PositionFetcher` pull from the feed; failures
//!    degrade to an empty timetable or no position.
//! 2. `PositionFetcher` names the current station via the strategy chain
//!    (feed hint, nearest station, raw GPS).
//! 3. `DelayEstimator` locates the current timetable entry and compares its
//!    scheduled time with the clock.
//! 4. `DelayReporter` adds the next station, estimated times and the trend.
//!
//! `DelayPipeline` wires all of this over one feed.

mod config;
mod estimator;
mod pipeline;
mod position;
mod report;
mod timetable;
mod trend;

pub use config::TrackingConfig;
pub use estimator::{DelayEstimator, estimate_delay, locate_by_time, locate_current_entry};
pub use pipeline::DelayPipeline;
pub use position::{DEFAULT_STRATEGIES, PositionFetcher, StationStrategy};
pub use report::{DelayReporter, build_detail};
pub use timetable::TimetableFetcher;
pub use trend::{DelayTrendTracker, classify};
