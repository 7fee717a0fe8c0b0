//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::DEFAULT_LOG_FILTER;

static INIT: Once = Once::new();

/// Initialize the hdkb tracing/logging system.
///
/// Reads the `HDKB_LOG` environment variable for per-module log levels.
/// Format: `HDKB_LOG=hdkb_analysis::crosses=debug,hdkb_analysis::articles=warn`
///
/// Falls back to `hdkb=info` if `HDKB_LOG` is not set or is invalid.
/// Events go to stderr so stdout stays free for command output.
///
/// Idempotent: later calls are no-ops.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("HDKB_LOG")
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
