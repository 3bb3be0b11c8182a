use anyhow::Result;
use clap::Parser;

mod catalog;
mod cli;
mod error;
mod server;
mod upstream;
mod util;

#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> Result<()> {
    cli::Args::parse().run().await
}
