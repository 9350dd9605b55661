//! Log setup for the driver.
//!
//! Events go to stderr. Stdout is reserved for the chain itself, so
//! `linkchain-node run --json > chain.json` yields a file `verify` can read.

use std::io;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How events are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// `"json"` in any case selects [`LogFormat::Json`]; anything else falls
    /// back to [`LogFormat::Pretty`].
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// `RUST_LOG` wins over the directives passed on the command line.
fn directives(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Installs the global subscriber. Panics if one is already set, so `main`
/// calls it once before dispatching a command.
pub fn init_logging(fallback_directives: &str, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(directives(fallback_directives));

    match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init(),
    }

    tracing::debug!(?format, "logging ready");
}
