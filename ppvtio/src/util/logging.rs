use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "ppvtio=info";
const VERBOSE_FILTER: &str = "ppvtio=debug,tower_http=debug";

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the built-in filters when set.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_FILTER
        } else {
            DEFAULT_FILTER
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
