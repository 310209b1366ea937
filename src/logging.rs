//! Logging initialisation
//!
//! The library only emits `tracing` events. Hosts that want them on stderr
//! call [`init_logging`] once at startup; later calls are no-ops. `RUST_LOG`
//! takes precedence over the configured level.

use crate::config::{LogConfig, LogFormat};
use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

pub fn init_logging(config: &LogConfig) {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_filter_str()));

        // another subscriber may already be installed by the host or a test
        let _ = match config.format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .try_init(),
        };
    });
}
