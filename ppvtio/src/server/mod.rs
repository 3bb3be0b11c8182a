pub mod addon;
pub mod middleware;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::sync::watch;

use crate::catalog::{PlaylistExtractor, SnapshotStore};
use crate::upstream::UpstreamClient;

pub use addon::AddonSettings;

#[derive(Clone)]
pub struct AppState {
    pub snapshots: SnapshotStore,
    pub upstream: Arc<UpstreamClient>,
    pub extractor: Arc<PlaylistExtractor>,
    pub settings: Arc<AddonSettings>,
}

/// All addon routes with the shared middleware applied.
pub fn router(state: AppState) -> Router {
    let app = Router::new()
        .route("/manifest.json", get(routes::manifest))
        .route("/catalog/{type}/{id}", get(routes::catalog))
        .route(
            "/catalog/{type}/{id}/{extra}",
            get(routes::catalog_with_extra),
        )
        .route("/meta/{type}/{id}", get(routes::meta))
        .with_state(state);

    middleware::apply(app)
}

/// Run the HTTP server until `shutdown_rx` flips to `true`.
pub async fn run_server(
    addr: SocketAddr,
    state: AppState,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while !*shutdown_rx.borrow_and_update() {
                if shutdown_rx.changed().await.is_err() {
                    break;
                }
            }
        })
        .await?;

    Ok(())
}
