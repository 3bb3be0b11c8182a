//! Response bodies of the Stremio addon protocol, built from a snapshot.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{Snapshot, ids};
use crate::upstream::StreamItem;

pub const ADDON_ID: &str = "ppvtio.vercel.com";
pub const ADDON_NAME: &str = "PPVtio | Vercel";
pub const ADDON_DESCRIPTION: &str = "Play PPV.to live-streams.";
pub const CONTENT_TYPE: &str = "PPV.to";
pub const CATALOG_NAME: &str = "PPV.to";
pub const ADDONS_ISSUER: &str = "https://stremio-addons.net";

const POSTER_SHAPE: &str = "landscape";

/// Static parts of the manifest that come from configuration.
#[derive(Debug, Clone, Default)]
pub struct AddonSettings {
    /// Signature issued by the addon catalogue, published verbatim.
    pub addons_signature: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: &'static str,
    pub version: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub resources: Vec<&'static str>,
    pub types: Vec<&'static str>,
    pub id_prefixes: Vec<&'static str>,
    pub catalogs: Vec<CatalogDescriptor>,
    #[serde(
        rename = "stremioAddonsConfig",
        skip_serializing_if = "Option::is_none"
    )]
    pub addons_config: Option<AddonsConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogDescriptor {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub name: &'static str,
    pub extra: Vec<CatalogExtra>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogExtra {
    pub name: &'static str,
    pub options: Vec<Option<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddonsConfig {
    pub issuer: &'static str,
    pub signature: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogResponse {
    pub metas: Vec<MetaPreview>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaPreview {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub poster_shape: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetaResponse {
    pub meta: MetaBody,
}

impl MetaResponse {
    pub fn empty() -> Self {
        Self {
            meta: MetaBody::Empty {},
        }
    }
}

/// Serialises as the detail record, or as `{}` when nothing was found.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MetaBody {
    Found(Box<MetaDetail>),
    Empty {},
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDetail {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub poster_shape: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub videos: Vec<Video>,
    pub behavior_hints: MetaBehaviorHints,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaBehaviorHints {
    pub default_video_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Video {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub released: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub streams: Vec<Stream>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub behavior_hints: StreamBehaviorHints,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamBehaviorHints {
    pub not_web_ready: bool,
    pub proxy_headers: ProxyHeaders,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProxyHeaders {
    pub request: BTreeMap<String, String>,
}

/// Build the manifest. The genre options track the current snapshot.
pub fn manifest(settings: &AddonSettings, snapshot: Option<&Snapshot>) -> Manifest {
    Manifest {
        id: ADDON_ID,
        version: env!("CARGO_PKG_VERSION"),
        name: ADDON_NAME,
        description: ADDON_DESCRIPTION,
        resources: vec!["catalog", "meta"],
        types: vec![CONTENT_TYPE],
        id_prefixes: vec![ids::ID_PREFIX],
        catalogs: vec![CatalogDescriptor {
            kind: CONTENT_TYPE,
            id: ids::composite(CATALOG_NAME),
            name: CATALOG_NAME,
            extra: vec![CatalogExtra {
                name: "genre",
                options: snapshot.map(Snapshot::genres).unwrap_or_default(),
            }],
        }],
        addons_config: settings
            .addons_signature
            .as_ref()
            .map(|signature| AddonsConfig {
                issuer: ADDONS_ISSUER,
                signature: signature.clone(),
            }),
    }
}

/// Summaries of every item in groups matching `genre` (all groups if `None`).
pub fn catalog(snapshot: &Snapshot, kind: &str, genre: Option<&str>) -> CatalogResponse {
    CatalogResponse {
        metas: snapshot
            .items_in(genre)
            .map(|item| MetaPreview {
                id: ids::composite(&item.id),
                kind: kind.to_string(),
                name: item.name.clone(),
                poster: item.poster.clone(),
                poster_shape: POSTER_SHAPE,
            })
            .collect(),
    }
}

/// Everything needed to render one meta record.
pub struct MetaInput<'a> {
    pub id: &'a str,
    pub kind: &'a str,
    pub item: &'a StreamItem,
    pub released: String,
    pub playlist_url: Option<String>,
    pub referer: String,
}

pub fn meta(input: MetaInput<'_>) -> MetaResponse {
    let MetaInput {
        id,
        kind,
        item,
        released,
        playlist_url,
        referer,
    } = input;
    let video_id = ids::video_id(id);

    let stream = Stream {
        url: playlist_url,
        name: item.uri_name.clone(),
        behavior_hints: StreamBehaviorHints {
            not_web_ready: true,
            proxy_headers: ProxyHeaders {
                request: BTreeMap::from([("referer".to_string(), referer)]),
            },
        },
    };

    MetaResponse {
        meta: MetaBody::Found(Box::new(MetaDetail {
            id: id.to_string(),
            kind: kind.to_string(),
            name: item.name.clone(),
            poster: item.poster.clone(),
            poster_shape: POSTER_SHAPE,
            background: item.poster.clone(),
            videos: vec![Video {
                id: video_id.clone(),
                title: item.name.clone(),
                released,
                thumbnail: item.poster.clone(),
                streams: vec![stream],
            }],
            behavior_hints: MetaBehaviorHints {
                default_video_id: video_id,
            },
        })),
    }
}
