use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logging system.
///
/// The log level is controlled through the RUST_LOG environment
/// variable. Default level: info
///
/// Examples:
/// - RUST_LOG=debug postgen build spec.json
/// - RUST_LOG=trace postgen check spec.json
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr; stdout carries the compile summary and paths.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
