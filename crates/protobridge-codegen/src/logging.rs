//! Logging setup for generator hosts (build scripts, tools)

use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber that writes to stderr.
///
/// `RUST_LOG` takes precedence over `default_level`. Does nothing if a global
/// subscriber is already installed.
pub fn init_logging(default_level: &str) {
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    // Try to set as global default (ignore error if already set)
    let _ = tracing::subscriber::set_global_default(subscriber);
}
