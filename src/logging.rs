use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr.
///
/// Verbosity defaults to `info` and can be overridden through `RUST_LOG`.
/// Stdout stays reserved for the report lines each tool prints.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
