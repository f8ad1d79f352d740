//! Cached station directory.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::future::Cache as MokaCache;
use tracing::info;

use crate::domain::StationSnapshot;
use crate::simrail::{SimRailError, SimRailFeed};

use super::error::DirectoryError;

/// Default snapshot lifetime: 5 minutes.
pub const DEFAULT_STATION_TTL: Duration = Duration::from_secs(5 * 60);

/// Longest cache expiry accepted: one year. moka rejects anything over 1000
/// years.
pub const MAX_EXPIRY: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// The station directory, cached for a fixed TTL.
///
/// Holds a single snapshot. Concurrent callers that miss the cache wait on
/// one shared fetch; a failed fetch is not cached, so the next call retries.
pub struct StationDirectory<F> {
    feed: Arc<F>,
    snapshot: MokaCache<(), Arc<StationSnapshot>>,
}

impl<F: SimRailFeed> StationDirectory<F> {
    /// Create a directory over `feed` whose snapshot expires after `ttl`,
    /// capped at [`MAX_EXPIRY`].
    pub fn new(feed: Arc<F>, ttl: Duration) -> Self {
        let snapshot = MokaCache::builder()
            .max_capacity(1)
            .time_to_live(ttl.min(MAX_EXPIRY))
            .build();

        Self { feed, snapshot }
    }

    /// Get the current snapshot, fetching a fresh one if it has expired.
    pub async fn stations(&self) -> Result<Arc<StationSnapshot>, DirectoryError> {
        let feed = Arc::clone(&self.feed);
        self.snapshot
            .try_get_with((), async move {
                let stations = feed.fetch_stations().await?;
                let snapshot = StationSnapshot::new(stations, Utc::now());
                info!(count = snapshot.len(), "refreshed station directory");
                Ok::<_, SimRailError>(Arc::new(snapshot))
            })
            .await
            .map_err(DirectoryError::Refresh)
    }

    /// Drop the cached snapshot; the next call fetches.
    pub fn invalidate(&self) {
        self.snapshot.invalidate_all();
    }
}
