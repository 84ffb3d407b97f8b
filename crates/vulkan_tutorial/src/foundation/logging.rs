//! Logging utilities

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// Messages go to stdout, one per line. `RUST_LOG` takes precedence over
/// `default_level`. Calling this twice is harmless.
pub fn init(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stdout)
        .format_timestamp(None)
        .try_init();
}
