use anyhow::{Context, Result};
use clap::Parser;

use crate::catalog::{ExtractorKind, PlaylistExtractor, Snapshot, ids};
use crate::util::time;

use super::UpstreamArgs;

#[derive(Parser, Debug)]
pub struct TestStreamCommand {
    /// Stream ID, with or without the `ppv_to:` prefix
    pub id: String,

    /// How playlist URLs are found on stream pages
    #[arg(long, value_enum, default_value_t = ExtractorKind::Pattern)]
    pub extractor: ExtractorKind,

    #[command(flatten)]
    pub upstream: UpstreamArgs,
}

impl TestStreamCommand {
    pub async fn run(self) -> Result<()> {
        let client = self.upstream.client()?;
        let extractor = PlaylistExtractor::new(self.extractor)?;

        let id = if ids::is_ours(&self.id) {
            self.id.clone()
        } else {
            ids::composite(&self.id)
        };

        let snapshot = Snapshot::new(client.fetch_listing().await?);
        let item = snapshot
            .find(&id)
            .with_context(|| format!("Stream '{}' not in the current listing", id))?;

        println!("Stream: {} ({})", item.name.as_deref().unwrap_or("(unnamed)"), id);
        if let Some(released) = item.starts_at.and_then(time::epoch_seconds_to_iso) {
            println!("  Starts:  {}", released);
        }

        let page_url = item
            .iframe
            .as_deref()
            .with_context(|| format!("Stream '{}' has no source page", id))?;
        println!("  Page:    {}", page_url);

        let body = client
            .fetch_page(page_url)
            .await
            .context("Failed to fetch source page")?;
        println!("  Fetched: {} bytes", body.len());

        match extractor.extract(&body) {
            Some(url) => println!("  Playlist: {}", url),
            None => println!("  Playlist: (no match)"),
        }
        println!("  Referer: {}", client.referer());

        Ok(())
    }
}
