//! Timetable lookup that degrades to "no timetable".

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{Timetable, TrainNumber};
use crate::simrail::SimRailFeed;

/// Fetches the planned stop sequence of a train.
pub struct TimetableFetcher<F> {
    feed: Arc<F>,
}

impl<F: SimRailFeed> TimetableFetcher<F> {
    pub fn new(feed: Arc<F>) -> Self {
        Self { feed }
    }

    /// Timetable for `train`, in upstream order.
    ///
    /// Any fetch or parse failure is logged and yields an empty timetable.
    pub async fn fetch_timetable(&self, train: &TrainNumber) -> Timetable {
        match self.feed.fetch_timetable(train).await {
            Ok(timetable) => {
                debug!(%train, entries = timetable.len(), "fetched timetable");
                timetable
            }
            Err(e) => {
                warn!(%train, error = %e, timeout = e.is_timeout(), "timetable unavailable");
                Timetable::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimetableEntry;
    use crate::simrail::MockSimRailClient;

    fn train(s: &str) -> TrainNumber {
        TrainNumber::parse(s).unwrap()
    }

    #[tokio::test]
    async fn returns_feed_timetable() {
        let feed = MockSimRailClient::new();
        feed.set_timetable(
            train("14120"),
            Timetable::new(vec![TimetableEntry::new("Katowice"), TimetableEntry::new("Zawiercie")]),
        )
        .await;
        let fetcher = TimetableFetcher::new(Arc::new(feed));

        let timetable = fetcher.fetch_timetable(&train("14120")).await;
        assert_eq!(timetable.len(), 2);
        assert_eq!(timetable.get(1).unwrap().station_name, "Zawiercie");
    }

    #[tokio::test]
    async fn failure_gives_empty_timetable() {
        let feed = MockSimRailClient::from_dir("data/mock").unwrap();
        feed.fail_timetables(true);
        let fetcher = TimetableFetcher::new(Arc::new(feed));

        assert!(fetcher.fetch_timetable(&train("14120")).await.is_empty());
    }
}
