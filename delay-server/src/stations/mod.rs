//! Station directory and nearest-station lookup.
//!
//! The directory holds one snapshot of every station on the configured
//! server, refreshed from the feed once its TTL lapses. The resolver maps
//! raw coordinates onto that snapshot.

mod directory;
mod error;
mod resolver;

pub use directory::{DEFAULT_STATION_TTL, MAX_EXPIRY, StationDirectory};
pub use error::DirectoryError;
pub use resolver::{
    DEFAULT_MAX_DISTANCE_M, GeoResolver, NearestStation, nearest_station, valid_radius,
};
