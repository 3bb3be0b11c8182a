use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, builder::FalseyValueParser};
use url::Url;

use crate::upstream::{UpstreamClient, UpstreamConfig, client::DEFAULT_BASE_URL};

mod list_streams;
mod serve;
mod test_stream;

pub use list_streams::ListStreamsCommand;
pub use serve::ServeCommand;
pub use test_stream::TestStreamCommand;

#[derive(Parser, Debug)]
#[command(name = "ppvtio")]
#[command(about = "Stremio addon serving PPV.to live streams")]
#[command(version)]
pub struct Args {
    /// Verbose logging (debug level, per-request traces). Any `DEV_LOGGING`
    /// value other than empty, `0`, `false`, `no` or `off` enables it.
    #[arg(
        short,
        long,
        global = true,
        env = "DEV_LOGGING",
        value_parser = FalseyValueParser::new()
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the addon HTTP server (default)
    Serve(ServeCommand),
    /// Fetch the stream listing once and print it
    ListStreams(ListStreamsCommand),
    /// Resolve the playlist URL of a single stream
    TestStream(TestStreamCommand),
}

impl Args {
    pub async fn run(self) -> Result<()> {
        crate::util::logging::init(self.verbose);

        let command = match self.command {
            Some(command) => command,
            // Parsed rather than defaulted so environment overrides still apply.
            None => Command::Serve(ServeCommand::try_parse_from(["ppvtio"])?),
        };

        match command {
            Command::Serve(cmd) => cmd.run().await,
            Command::ListStreams(cmd) => cmd.run().await,
            Command::TestStream(cmd) => cmd.run().await,
        }
    }
}

/// Upstream connection options shared by every command.
#[derive(clap::Args, Debug, Clone)]
pub struct UpstreamArgs {
    /// Base URL of the stream listing site
    #[arg(long, env = "PPV_UPSTREAM", default_value = DEFAULT_BASE_URL)]
    pub upstream: Url,

    /// Timeout in seconds for each outbound request (0 disables)
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// HTTP or SOCKS proxy for outbound requests
    #[arg(long, env = "PPV_PROXY")]
    pub proxy: Option<String>,
}

impl UpstreamArgs {
    pub fn config(&self) -> UpstreamConfig {
        UpstreamConfig {
            timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
            proxy: self.proxy.clone(),
            ..UpstreamConfig::new(self.upstream.clone())
        }
    }

    pub fn client(&self) -> Result<Arc<UpstreamClient>> {
        Ok(Arc::new(UpstreamClient::new(&self.config())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let args = Args::try_parse_from(["ppvtio"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn test_dev_logging_values() {
        // Only this test touches DEV_LOGGING.
        let cases = [
            ("1", true),
            ("yes", true),
            ("on", true),
            ("0", false),
            ("", false),
        ];
        for (value, verbose) in cases {
            unsafe { std::env::set_var("DEV_LOGGING", value) };
            let args = Args::try_parse_from(["ppvtio"]).unwrap();
            assert_eq!(args.verbose, verbose, "DEV_LOGGING={value:?}");
        }
        unsafe { std::env::remove_var("DEV_LOGGING") };
    }

    #[test]
    fn test_upstream_args() {
        let args = Args::try_parse_from([
            "ppvtio",
            "list-streams",
            "--upstream",
            "https://mirror.example",
            "--timeout",
            "0",
        ])
        .unwrap();

        let Some(Command::ListStreams(cmd)) = args.command else {
            panic!("expected list-streams");
        };
        let config = cmd.upstream.config();
        assert_eq!(config.base_url.as_str(), "https://mirror.example/");
        assert!(config.timeout.is_none());
    }
}
