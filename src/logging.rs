//! Tracing setup for the binary.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "deskcalc=info";
const VERBOSE_FILTER: &str = "deskcalc=debug";

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins unless `verbose` is set. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
