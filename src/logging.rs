//! Tracing subscriber setup for binaries

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies to every target.
/// Calling this twice is harmless (the second install is ignored).
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
