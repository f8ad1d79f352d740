//! SimRail public API client.
//!
//! Wraps the three upstream feeds the tracker needs:
//! - `trains-open`: live roster with positions, speed and signal state
//! - `stations-open`: station directory with coordinates
//! - `getAllTimetables`: the planned stop sequence of one train
//!
//! The feeds disagree with each other (and sometimes with themselves) about
//! field naming, wrap lists inconsistently and send numbers as strings.
//! All of that is absorbed in `types` and `convert`; the rest of the crate
//! only sees domain types through [`SimRailFeed`].

mod client;
mod convert;
mod error;
mod feed;
mod mock;
mod types;

pub use client::{SimRailClient, SimRailConfig};
pub use convert::{stations_from_json, timetable_from_json, trains_from_json};
pub use error::SimRailError;
pub use feed::SimRailFeed;
pub use mock::MockSimRailClient;
