use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::upstream::{CategoryGroup, StreamItem, StreamListing};

use super::ids;

/**
    Immutable view of the upstream listing at one point in time.

    Built once per successful refresh and never mutated afterwards.
*/
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub groups: Vec<CategoryGroup>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(listing: StreamListing) -> Self {
        Self {
            groups: listing.streams,
            fetched_at: crate::util::time::now(),
        }
    }

    /// Category labels in listing order. Duplicates are kept.
    pub fn genres(&self) -> Vec<Option<String>> {
        self.groups.iter().map(|g| g.category.clone()).collect()
    }

    /// Items of every group matching `genre`, or of all groups when `None`.
    pub fn items_in<'a>(
        &'a self,
        genre: Option<&'a str>,
    ) -> impl Iterator<Item = &'a StreamItem> {
        self.groups
            .iter()
            .filter(move |g| genre.is_none() || g.category.as_deref() == genre)
            .flat_map(|g| g.streams.iter())
    }

    /// Look up an item by its client-facing (prefixed) id.
    pub fn find(&self, composite_id: &str) -> Option<&StreamItem> {
        let raw_id = ids::strip_prefix(composite_id)?;
        self.items_in(None).find(|item| item.id == raw_id)
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.streams.len()).sum()
    }
}

/**
    Single-writer, many-reader cell holding the latest snapshot.

    Publishing swaps the whole `Arc`; readers clone it out and never see a
    partially built snapshot or block the refresher.
*/
#[derive(Clone)]
pub struct SnapshotStore {
    tx: Arc<watch::Sender<Option<Arc<Snapshot>>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// The latest snapshot, or `None` before the first successful refresh.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.tx.borrow().clone()
    }

    /// Replace the current snapshot, returning the previous one.
    pub fn publish(&self, snapshot: Arc<Snapshot>) -> Option<Arc<Snapshot>> {
        self.tx.send_replace(Some(snapshot))
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
