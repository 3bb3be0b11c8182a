use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::Parser;
use tokio::{signal, sync::watch};
use tracing::{error, info};

use crate::catalog::{ExtractorKind, PlaylistExtractor, Refresher, SnapshotStore};
use crate::server::{AddonSettings, AppState};

use super::UpstreamArgs;

#[derive(Parser, Debug)]
pub struct ServeCommand {
    /// HTTP server port
    #[arg(short, long, env = "PORT", default_value = "7000")]
    pub port: u16,

    /// Externally visible hostname, only used for the startup message
    #[arg(long, env = "SPACE_HOST")]
    pub public_host: Option<String>,

    /// Seconds between stream listing refreshes
    #[arg(long, default_value = "3600")]
    pub refresh_interval: u64,

    /// Wait one full interval before the first refresh
    #[arg(long)]
    pub defer_first_refresh: bool,

    /// Signature published in the manifest's `stremioAddonsConfig`
    #[arg(long, env = "STREMIO_ADDONS_SIGNATURE")]
    pub addons_signature: Option<String>,

    /// How playlist URLs are found on stream pages
    #[arg(long, value_enum, default_value_t = ExtractorKind::Pattern)]
    pub extractor: ExtractorKind,

    #[command(flatten)]
    pub upstream: UpstreamArgs,
}

impl ServeCommand {
    fn config_url(&self) -> String {
        match &self.public_host {
            Some(host) => format!("https://{host}"),
            None => format!("http://localhost:{}", self.port),
        }
    }

    pub async fn run(self) -> Result<()> {
        // Shutdown signal
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        // Core state
        let upstream = self.upstream.client()?;
        let snapshots = SnapshotStore::new();
        let state = AppState {
            snapshots: snapshots.clone(),
            upstream: Arc::clone(&upstream),
            extractor: Arc::new(PlaylistExtractor::new(self.extractor)?),
            settings: Arc::new(AddonSettings {
                addons_signature: self.addons_signature.clone(),
            }),
        };

        // Stream listing refresher
        let mut refresher = Refresher::new(
            upstream,
            snapshots,
            Duration::from_secs(self.refresh_interval.max(1)),
        );
        if self.defer_first_refresh {
            refresher = refresher.defer_first_refresh();
        }
        let refresher_handle = tokio::spawn(refresher.run(shutdown_rx.clone()));

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));

        let mut server_handle = tokio::spawn(crate::server::run_server(
            addr,
            state,
            shutdown_rx.clone(),
        ));

        info!(
            "Addon server v{} running on port {}",
            env!("CARGO_PKG_VERSION"),
            self.port
        );
        info!("Access the configuration page at: {}", self.config_url());
        info!(
            upstream = %self.upstream.upstream,
            extractor = ?self.extractor,
            "serving streams"
        );

        // Wait for Ctrl+C, or for the server to die on its own
        tokio::select! {
            result = signal::ctrl_c() => {
                result?;
                info!("shutting down");
                let _ = shutdown_tx.send(true);

                if let Ok(Err(e)) = server_handle.await {
                    error!(error = %e, "server error");
                }
                let _ = refresher_handle.await;
            }
            result = &mut server_handle => {
                let _ = shutdown_tx.send(true);
                refresher_handle.abort();

                return match result {
                    Ok(Ok(())) => Err(anyhow!("server stopped unexpectedly")),
                    Ok(Err(e)) => Err(anyhow!(e).context(format!("server on {addr} failed"))),
                    Err(e) => Err(e.into()),
                };
            }
        }

        info!("done");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cmd = ServeCommand::try_parse_from(["serve"]).unwrap();
        assert_eq!(cmd.refresh_interval, 3600);
        assert!(!cmd.defer_first_refresh);
        assert_eq!(cmd.extractor, ExtractorKind::Pattern);
        assert_eq!(cmd.upstream.timeout, 30);
    }

    #[tokio::test]
    async fn test_run_fails_when_port_is_taken() {
        let taken = std::net::TcpListener::bind("0.0.0.0:0").unwrap();
        let port = taken.local_addr().unwrap().port().to_string();

        let cmd = ServeCommand::try_parse_from([
            "serve",
            "--port",
            &port,
            "--defer-first-refresh",
            "--upstream",
            "http://127.0.0.1:9",
        ])
        .unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), cmd.run())
            .await
            .expect("run should return once the bind fails");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_url() {
        let mut cmd = ServeCommand::try_parse_from(["serve", "--port", "8080"]).unwrap();
        cmd.public_host = None;
        assert_eq!(cmd.config_url(), "http://localhost:8080");

        let cmd = ServeCommand::try_parse_from(["serve", "--public-host", "addon.example"]).unwrap();
        assert_eq!(cmd.config_url(), "https://addon.example");
    }
}
