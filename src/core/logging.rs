//! Logging initialization

fn builder() -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
}

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// meshterrain::core::logging::init();
/// log::info!("Sampling started");
/// ```
pub fn init() {
    builder().init();
}

/// Like [`init`], with millisecond timestamps for timing long runs from the command line
///
/// ```
/// meshterrain::core::logging::init_with_millis();
/// log::info!("Row 12/512");
/// ```
pub fn init_with_millis() {
    builder().format_timestamp_millis().init();
}
