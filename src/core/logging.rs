//! Logging initialization and utilities

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// echo_garden::core::logging::init();
/// log::info!("Garden opened");
/// ```
pub fn init() {
    // A host may have installed a logger already (tests, embedding apps).
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init();
}
