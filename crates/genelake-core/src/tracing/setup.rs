//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the genelake tracing/logging system.
///
/// Reads the `GENELAKE_LOG` environment variable for per-module log levels.
/// Format: `GENELAKE_LOG=genelake_etl=debug,genelake_storage=warn`
///
/// Falls back to `info` for every genelake crate if `GENELAKE_LOG` is not set
/// or is invalid.
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("GENELAKE_LOG")
            .unwrap_or_else(|_| EnvFilter::new(default_directives()));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}

/// Default filter: info for every genelake crate.
pub fn default_directives() -> &'static str {
    "genelake_core=info,genelake_storage=info,genelake_etl=info"
}
