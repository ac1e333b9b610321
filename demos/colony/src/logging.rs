//! Diagnostics via `RUST_LOG`, written to stderr.  The periodic colony report
//! goes to stdout and is unaffected.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Reads `RUST_LOG`; defaults to `warn`.
///
/// ```bash
/// RUST_LOG=bt_sim=debug,colony=debug cargo run -p colony
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
