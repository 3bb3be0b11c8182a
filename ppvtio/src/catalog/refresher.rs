use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::upstream::UpstreamClient;

use super::snapshot::{Snapshot, SnapshotStore};

/**
    Periodically replaces the cached snapshot with a fresh upstream listing.

    Failures leave the previous snapshot in place and are only logged; the
    next attempt happens on the next tick.
*/
pub struct Refresher {
    upstream: Arc<UpstreamClient>,
    store: SnapshotStore,
    interval: Duration,
    immediate: bool,
}

impl Refresher {
    pub fn new(upstream: Arc<UpstreamClient>, store: SnapshotStore, interval: Duration) -> Self {
        Self {
            upstream,
            store,
            interval,
            immediate: true,
        }
    }

    /// Wait one full interval before the first fetch instead of fetching at
    /// startup.
    pub fn defer_first_refresh(mut self) -> Self {
        self.immediate = false;
        self
    }

    /// Fetch once and publish on success.
    pub async fn refresh_once(&self) -> Result<Arc<Snapshot>> {
        let listing = self.upstream.fetch_listing().await?;
        let snapshot = Arc::new(Snapshot::new(listing));

        info!(
            categories = snapshot.groups.len(),
            streams = snapshot.item_count(),
            "stream listing refreshed"
        );

        self.store.publish(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Run until `shutdown_rx` flips to `true`.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let start = if self.immediate {
            time::Instant::now()
        } else {
            time::Instant::now() + self.interval
        };
        let mut ticker = time::interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(
            interval_secs = self.interval.as_secs(),
            immediate = self.immediate,
            "refresher started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.refresh_once().await {
                        warn!(error = %e, "stream listing refresh failed, keeping last snapshot");
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        debug!("refresher stopped");
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use url::Url;

    use super::*;
    use crate::test_support::serve;
    use crate::upstream::UpstreamConfig;

    fn refresher_for(base: &str, store: SnapshotStore) -> Refresher {
        let config = UpstreamConfig::new(Url::parse(base).unwrap());
        let upstream = Arc::new(UpstreamClient::new(&config).unwrap());
        Refresher::new(upstream, store, Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn test_refresh_publishes_snapshot() {
        let addr = serve(Router::new().route(
            "/api/streams",
            get(|| async {
                r#"{"streams":[{"category":"NFL","streams":[{"id":1,"name":"Game A"}]}]}"#
            }),
        ))
        .await;

        let store = SnapshotStore::new();
        let refresher = refresher_for(&format!("http://{addr}"), store.clone());

        let snapshot = refresher.refresh_once().await.unwrap();
        assert_eq!(snapshot.item_count(), 1);
        assert!(Arc::ptr_eq(&store.current().unwrap(), &snapshot));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let addr = serve(
            Router::new()
                .route("/api/streams", get(|| async { "not json" }))
                .route(
                    "/down/api/streams",
                    get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
                ),
        )
        .await;

        let store = SnapshotStore::new();
        let previous = Arc::new(crate::catalog::snapshot::tests::sample_snapshot());
        store.publish(Arc::clone(&previous));

        let bad_body = refresher_for(&format!("http://{addr}"), store.clone());
        assert!(bad_body.refresh_once().await.is_err());

        let bad_status = refresher_for(&format!("http://{addr}/down/"), store.clone());
        assert!(bad_status.refresh_once().await.is_err());

        assert!(Arc::ptr_eq(&store.current().unwrap(), &previous));
    }

    #[tokio::test]
    async fn test_run_fetches_immediately_and_stops_on_shutdown() {
        let addr = serve(Router::new().route(
            "/api/streams",
            get(|| async { r#"{"streams":[]}"# }),
        ))
        .await;

        let store = SnapshotStore::new();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle =
            tokio::spawn(refresher_for(&format!("http://{addr}"), store.clone()).run(shutdown_rx));

        time::timeout(Duration::from_secs(5), async {
            while store.current().is_none() {
                time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("first refresh should not wait for the interval");

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_run_waits_one_interval() {
        let addr = serve(Router::new().route(
            "/api/streams",
            get(|| async { r#"{"streams":[]}"# }),
        ))
        .await;

        let store = SnapshotStore::new();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let refresher =
            refresher_for(&format!("http://{addr}"), store.clone()).defer_first_refresh();
        let handle = tokio::spawn(refresher.run(shutdown_rx));
        tokio::task::yield_now().await;

        time::advance(Duration::from_secs(60)).await;
        tokio::task::yield_now().await;
        assert!(store.current().is_none());

        time::advance(Duration::from_secs(3600)).await;
        time::timeout(Duration::from_secs(5), async {
            while store.current().is_none() {
                time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("snapshot should be published after one interval");

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
