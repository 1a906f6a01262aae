use tracing_subscriber::EnvFilter;

/// Initialize a stderr `tracing` subscriber honoring `RUST_LOG`.
///
/// The library itself only emits events; it never installs a subscriber on
/// its own. Embedding applications and test harnesses call this once at
/// startup. A second call panics because the global subscriber is already
/// set, so ownership of the single call stays with the embedder.
pub fn init_logging_stderr() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,spdx_library=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
