use anyhow::{bail, Context};
use simulator::{config::Config, logging, SimulationType, SimulatorInterface};
use std::env;

// ------------------------------------------------------------------------------------------------
// Main
// ------------------------------------------------------------------------------------------------

/// Runs the scenario named by the first argument, or asks for one
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load simulator configuration")?;
    logging::setup_logging(&config.simulation.results_dir).context("Failed to set up logging")?;

    let interface = SimulatorInterface::new();
    match env::args().nth(1) {
        Some(arg) => {
            let Some(choice) = SimulationType::from_input(&arg) else {
                bail!("Unknown simulation type '{}'\n{}", arg, interface.get_menu_text());
            };
            interface.run(choice, &config).await?;
        }
        None => interface.run_interactive(&config).await?,
    }
    Ok(())
}
