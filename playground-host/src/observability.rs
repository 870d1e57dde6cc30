//! Tracing initialization. Call once at process startup; later calls are no-ops.

use crate::config::HostConfig;
use tracing_subscriber::{prelude::*, EnvFilter};

/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &HostConfig) {
    let level = config.effective_log_level();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if config.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}
