//! Process-wide tracing setup shared by binaries and tests.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging for the process.
///
/// Filtering comes from `RUST_LOG` (default `info`). Output is JSON unless
/// `LOG_FORMAT=pretty` is set for local runs. Safe to call more than once;
/// later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("pretty") => {
            let _ = builder.pretty().try_init();
        }
        _ => {
            let _ = builder.json().try_init();
        }
    }
}
