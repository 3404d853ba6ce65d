//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::constants::{DEFAULT_LOG_FILTER, LOG_ENV_VAR};

static INIT: Once = Once::new();

/// Initialize logging for counterfact.
///
/// Reads `COUNTERFACT_LOG` for per-module levels, e.g.
/// `COUNTERFACT_LOG=counterfact_inference=debug,counterfact_scm=warn`.
/// Falls back to `counterfact=info`. Idempotent.
pub fn init_tracing() {
    init_with_fallback(DEFAULT_LOG_FILTER);
}

/// Like [`init_tracing`], but falls back to the configured level.
pub fn init_tracing_with(config: &LoggingConfig) {
    init_with_fallback(config.effective_level());
}

fn init_with_fallback(fallback: &str) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(fallback));

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
