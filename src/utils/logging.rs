use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

static ENABLE_LOGGING: AtomicBool = AtomicBool::new(false);

/// Initializes logging based on the NETSIM_LOGGING environment variable.
/// - If NETSIM_LOGGING=true, simulation events are forwarded to the `log` facade.
/// - If NETSIM_LOGGING=false or not set, logging is disabled.
/// - To see logs in tests, run: NETSIM_LOGGING=true RUST_LOG=debug cargo test -- --nocapture
///
/// The facade still needs a logger installed by the binary (the simulator uses env_logger).
pub fn init_logging() {
    match env::var("NETSIM_LOGGING") {
        Ok(value) => match value.as_str() {
            "true" => ENABLE_LOGGING.store(true, Ordering::SeqCst),
            "false" => ENABLE_LOGGING.store(false, Ordering::SeqCst),
            other => {
                eprintln!(
                    "NETSIM_LOGGING must be 'true' or 'false' (got '{}'), logging disabled",
                    other
                );
                ENABLE_LOGGING.store(false, Ordering::SeqCst);
            }
        },
        Err(_) => ENABLE_LOGGING.store(false, Ordering::SeqCst),
    }
}

/// Returns whether per-event logging is switched on.
pub fn enabled() -> bool {
    ENABLE_LOGGING.load(Ordering::Relaxed)
}

/// Logs a debug message tagged with a component prefix
pub fn log(prefix: &str, message: &str) {
    if enabled() {
        log::debug!("  [{}]   {}", prefix, message);
    }
}

/// Logs a summary line; always forwarded regardless of NETSIM_LOGGING
pub fn info(prefix: &str, message: &str) {
    log::info!("  [{}]   {}", prefix, message);
}
