//! Tracing setup for the CLI.

use std::env;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `STUDYDESK_LOG` is unset or invalid. Targets match by
/// prefix, so this covers both `studydesk` and `studydesk_core`.
pub const DEFAULT_FILTER: &str = "studydesk=warn";

/// Install the global subscriber. Logs go to stderr so stdout stays
/// machine-readable.
///
/// `STUDYDESK_LOG` takes an `EnvFilter` directive; `STUDYDESK_LOG_FORMAT=json`
/// switches to JSON lines.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("STUDYDESK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let format = env::var("STUDYDESK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
