//! Public SDK surface for askql.
//!
//! This crate re-exports the building blocks of the service and provides a
//! small initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use askql_rs_config as config;
pub use askql_rs_core as core;
/// Re-export for convenience.
pub use askql_rs_engine as engine;
pub use askql_rs_protocol as protocol;
pub use askql_rs_server as server;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// Timestamps carry milliseconds and `RUST_LOG` sets the filter. Does nothing
/// without the feature, or when a logger is already installed.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::init_logging;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging();
        init_logging();
        log::info!("logging initialized twice (ok=true)");
    }
}
