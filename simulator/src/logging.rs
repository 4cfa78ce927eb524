//! Log setup for the netsim driver.
//! Routes the core's log records through env_logger, optionally into a file.

use netsim::utils::logging;
use std::env;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Name of the log file written inside the results directory
pub const LOG_FILE_NAME: &str = "simulation.log";

/// Sets up logging if the ENABLE_LOGS environment variable is set.
///
/// Records go to `<results_dir>/simulation.log`, replacing any previous file.
/// Without ENABLE_LOGS only warnings and errors reach stderr.
pub fn setup_logging(results_dir: &str) -> io::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{}] {:<5} {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.args()
        )
    });

    if env::var("ENABLE_LOGS").is_ok() {
        fs::create_dir_all(results_dir)?;
        let log_path = Path::new(results_dir).join(LOG_FILE_NAME);
        if let Err(e) = fs::remove_file(&log_path) {
            // Ignore error if file doesn't exist
            if e.kind() != io::ErrorKind::NotFound {
                eprintln!("Error deleting log file: {}", e);
            }
        }
        let file = File::create(&log_path)?;
        builder
            .filter_level(log::LevelFilter::Debug)
            .target(env_logger::Target::Pipe(Box::new(file)));

        env::set_var("NETSIM_LOGGING", "true");
    } else {
        builder.filter_level(log::LevelFilter::Warn);
    }

    // A second call keeps the logger installed first
    let _ = builder.try_init();
    logging::init_logging();
    Ok(())
}
