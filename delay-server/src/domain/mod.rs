//! Domain types for the delay tracker.
//!
//! These types represent normalized SimRail data. Raw upstream shapes are
//! converted into them at the feed boundary (see `simrail::convert`), so
//! code that receives these types never sees upstream field-name variants.

mod delay;
mod geo;
mod position;
mod station;
mod time;
mod timetable;
mod train_number;

pub use delay::{DelayDetail, DelayEstimate, DelayTrend};
pub use geo::{Coordinates, EARTH_RADIUS_M, haversine_distance};
pub use position::{LiveTrain, PositionSnapshot, StationSource};
pub use station::{Station, StationSnapshot};
pub use time::{TimeError, add_minutes, parse_timestamp, rounded_minutes_since};
pub use timetable::{StopType, Timetable, TimetableEntry};
pub use train_number::{InvalidTrainNumber, TrainNumber};
