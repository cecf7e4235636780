//! Tracing/logging initialization.
//!
//! Filtering comes from RUST_LOG (default "info"). Output is JSON unless
//! BANKSY_LOG_FORMAT=plain, which is easier on the eyes in dev.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let plain = std::env::var("BANKSY_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("plain"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    if plain {
        let _ = builder.try_init();
    } else {
        let _ = builder.json().try_init();
    }
}
