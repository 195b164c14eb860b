//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn, LevelFilter};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    // A second init (tests, embedding hosts) is not an error for us.
    let _ = env_logger::try_init();
}

/// Initialize logging with a default level, still overridable through `RUST_LOG`
///
/// Unknown level names fall back to `info`.
pub fn init_with_level(level: &str) {
    let filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
    let _ = env_logger::Builder::new()
        .filter_level(filter)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
