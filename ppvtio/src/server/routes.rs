use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use crate::catalog::ids;
use crate::error::{Error, Result};
use crate::util::time;

use super::AppState;
use super::addon::{self, CatalogResponse, Manifest, MetaInput, MetaResponse};

/// Paths look like `/meta/{type}/{id}.json`; the router only sees whole
/// segments, so the extension is stripped here.
fn strip_json(segment: &str) -> std::result::Result<&str, StatusCode> {
    segment.strip_suffix(".json").ok_or(StatusCode::NOT_FOUND)
}

/// Value of the last `genre` key in a catalog extra segment such as
/// `genre=Ice%20Hockey&skip=0`.
pub fn genre_filter(extra: &str) -> Option<String> {
    url::form_urlencoded::parse(extra.as_bytes())
        .filter(|(key, _)| key == "genre")
        .last()
        .map(|(_, value)| value.into_owned())
}

/// Addon manifest endpoint.
pub async fn manifest(State(state): State<AppState>) -> Json<Manifest> {
    let snapshot = state.snapshots.current();
    Json(addon::manifest(&state.settings, snapshot.as_deref()))
}

/// Catalog endpoint without extra parameters.
pub async fn catalog(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> std::result::Result<Json<CatalogResponse>, StatusCode> {
    let id = strip_json(&id)?;
    Ok(Json(catalog_or_empty(&state, &kind, id, None)))
}

/// Catalog endpoint with an extra segment (`genre=...`).
pub async fn catalog_with_extra(
    State(state): State<AppState>,
    Path((kind, id, extra)): Path<(String, String, String)>,
) -> std::result::Result<Json<CatalogResponse>, StatusCode> {
    let extra = strip_json(&extra)?;
    Ok(Json(catalog_or_empty(&state, &kind, &id, Some(extra))))
}

fn catalog_or_empty(
    state: &AppState,
    kind: &str,
    id: &str,
    extra: Option<&str>,
) -> CatalogResponse {
    resolve_catalog(state, kind, id, extra).unwrap_or_else(|e| {
        debug!(error = %e, "catalog request failed");
        CatalogResponse::default()
    })
}

fn resolve_catalog(
    state: &AppState,
    kind: &str,
    id: &str,
    extra: Option<&str>,
) -> Result<CatalogResponse> {
    if !ids::is_ours(id) {
        return Err(Error::unknown_id("Catalog", id));
    }

    let genre = extra.and_then(genre_filter);
    let Some(snapshot) = state.snapshots.current() else {
        debug!("catalog requested before first refresh");
        return Ok(CatalogResponse::default());
    };

    Ok(addon::catalog(&snapshot, kind, genre.as_deref()))
}

/// Meta endpoint. Scrapes the stream's source page for the playlist URL.
pub async fn meta(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> std::result::Result<Json<MetaResponse>, StatusCode> {
    let id = strip_json(&id)?;

    let response = match resolve_meta(&state, &kind, id).await {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, "meta request failed");
            MetaResponse::empty()
        }
    };

    Ok(Json(response))
}

async fn resolve_meta(state: &AppState, kind: &str, id: &str) -> Result<MetaResponse> {
    if !ids::is_ours(id) {
        return Err(Error::unknown_id("Meta", id));
    }

    let snapshot = state
        .snapshots
        .current()
        .ok_or_else(|| Error::unknown_id("Meta", id))?;
    let item = snapshot
        .find(id)
        .ok_or_else(|| Error::unknown_id("Meta", id))?;

    let released = item
        .starts_at
        .and_then(time::epoch_seconds_to_iso)
        .ok_or_else(|| Error::InvalidStartTime(item.id.clone()))?;
    let page_url = item
        .iframe
        .as_deref()
        .ok_or_else(|| Error::MissingPage(item.id.clone()))?;

    let body = state.upstream.fetch_page(page_url).await?;
    let playlist_url = state.extractor.extract(&body);
    if playlist_url.is_none() {
        debug!(id, page_url, "no playlist URL found on source page");
    }

    Ok(addon::meta(MetaInput {
        id,
        kind,
        item,
        released,
        playlist_url,
        referer: state.upstream.referer(),
    }))
}
