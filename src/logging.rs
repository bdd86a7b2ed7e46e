//! Console logging setup.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "SCENE_CHANGE_LOG";

/// Install a compact console subscriber.
///
/// The filter comes from `SCENE_CHANGE_LOG`, then `RUST_LOG`, then
/// `default_level` (for example `"info"` or `"info,scene_change=debug"`).
/// Calling this when a global subscriber is already set does nothing.
pub fn init_logging(default_level: &str) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(version = env!("CARGO_PKG_VERSION"), "logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        init_logging("debug");
        init_logging("info");
        tracing::info!("still logging");
    }
}
