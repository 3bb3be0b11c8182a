use anyhow::Result;
use clap::Parser;

use crate::catalog::{Snapshot, ids};
use crate::util::time;

use super::UpstreamArgs;

#[derive(Parser, Debug)]
pub struct ListStreamsCommand {
    /// Only show streams in this category
    #[arg(long)]
    pub genre: Option<String>,

    #[command(flatten)]
    pub upstream: UpstreamArgs,
}

impl ListStreamsCommand {
    pub async fn run(self) -> Result<()> {
        let client = self.upstream.client()?;
        let snapshot = Snapshot::new(client.fetch_listing().await?);

        println!(
            "{} categories, {} streams (fetched {})",
            snapshot.groups.len(),
            snapshot.item_count(),
            snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        );

        for group in &snapshot.groups {
            let label = group.category.as_deref().unwrap_or("(uncategorized)");
            if self
                .genre
                .as_deref()
                .is_some_and(|genre| group.category.as_deref() != Some(genre))
            {
                continue;
            }

            println!();
            println!("{} ({})", label, group.streams.len());
            for item in &group.streams {
                let starts = item
                    .starts_at
                    .and_then(time::from_epoch_seconds)
                    .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {:<24} {}  {}",
                    ids::composite(&item.id),
                    starts,
                    item.name.as_deref().unwrap_or("(unnamed)")
                );
            }
        }

        Ok(())
    }
}
