//! Station directory error types.

use std::sync::Arc;

use crate::simrail::SimRailError;

/// Errors from the station directory.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
    /// Fetching a fresh snapshot failed.
    ///
    /// The upstream error is shared by every caller that was waiting on the
    /// same refresh.
    #[error("station directory refresh failed: {0}")]
    Refresh(Arc<SimRailError>),
}

impl From<SimRailError> for DirectoryError {
    fn from(e: SimRailError) -> Self {
        DirectoryError::Refresh(Arc::new(e))
    }
}
