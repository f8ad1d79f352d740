//! Web layer for the delay tracker.
//!
//! Provides JSON endpoints for stations, live trains, timetables and delays.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
