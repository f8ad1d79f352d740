//! Application state for the web layer.

use std::sync::Arc;

use crate::simrail::SimRailFeed;
use crate::tracking::{DelayPipeline, TrackingConfig};

/// Shared application state.
///
/// Contains the tracking pipeline every handler works through.
pub struct AppState<F> {
    /// Tracking pipeline over the configured feed
    pub pipeline: Arc<DelayPipeline<F>>,
}

impl<F: SimRailFeed> AppState<F> {
    /// Create a new app state.
    pub fn new(feed: F, config: &TrackingConfig) -> Self {
        Self {
            pipeline: Arc::new(DelayPipeline::new(feed, config)),
        }
    }
}

// Manual impl: `F` itself need not be `Clone`.
impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}
