use std::time::Duration;

use reqwest::header;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

use super::types::StreamListing;

pub const DEFAULT_BASE_URL: &str = "https://ppv.to";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const STREAMS_PATH: &str = "api/streams";

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Connection settings for the upstream site.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: Url,
    /// Applied to every outbound request. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub proxy: Option<String>,
}

impl UpstreamConfig {
    /// `base_url` is treated as a directory, so a mirror mounted under a
    /// sub-path keeps that path when API paths are joined onto it.
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            base_url,
            timeout: Some(DEFAULT_TIMEOUT),
            proxy: None,
        }
    }
}

/**
    HTTP client for the stream listing API and the per-stream embed pages.

    Stateless: nothing fetched here is cached, callers decide what to keep.
*/
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: Url,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(proxy_url) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    pub fn streams_url(&self) -> Result<Url> {
        Ok(self.base_url.join(STREAMS_PATH)?)
    }

    /// Referer the playlist hosts expect, i.e. the upstream origin with a
    /// trailing slash.
    pub fn referer(&self) -> String {
        format!("{}/", self.base_url.origin().ascii_serialization())
    }

    /// Fetch and parse the full category/stream listing.
    pub async fn fetch_listing(&self) -> Result<StreamListing> {
        let url = self.streams_url()?;
        let body = self.get_text(url.as_str()).await?;
        let listing = StreamListing::from_json(&body)?;
        debug!(
            categories = listing.streams.len(),
            "fetched stream listing"
        );
        Ok(listing)
    }

    /// Fetch the raw body of a stream's embed page.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        self.get_text(url).await
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "*/*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
