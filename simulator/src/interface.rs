use crate::config::{Config, ConfigError};
use crate::scenarios::{run_all_tests, sim_sweep_bus, sim_sweep_queue, variate_check};
use netsim::SensingPolicy;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationType {
    VariateCheck,
    SweepInfiniteQueue,
    SweepFiniteQueue,
    SweepPersistentBus,
    SweepNonPersistentBus,
    RunAllTests,
    Exit,
}

impl SimulationType {
    pub fn from_input(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(SimulationType::VariateCheck),
            "2" => Some(SimulationType::SweepInfiniteQueue),
            "3" => Some(SimulationType::SweepFiniteQueue),
            "4" => Some(SimulationType::SweepPersistentBus),
            "5" => Some(SimulationType::SweepNonPersistentBus),
            "6" => Some(SimulationType::RunAllTests),
            "0" => Some(SimulationType::Exit),
            _ => None,
        }
    }
}

pub struct SimulatorInterface;

impl Default for SimulatorInterface {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatorInterface {
    pub fn new() -> Self {
        Self
    }

    pub fn get_menu_text(&self) -> &'static str {
        "Available simulation types:\n  1. Exponential variate check\n  2. Sweep infinite buffer queue\n  3. Sweep finite buffer queue\n  4. Sweep persistent bus\n  5. Sweep non-persistent bus\n  6. Run All Tests\n  0. Exit"
    }

    pub fn show_menu(&self) {
        println!("=== netsim Simulator ===");
        println!("{}", self.get_menu_text());
    }

    /// Reads one choice from `input`; `Ok(None)` for an unrecognised line
    pub fn read_choice(&self, input: &mut impl BufRead) -> io::Result<Option<SimulationType>> {
        print!("\nSelect simulation type (0-6): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // End of input
            return Ok(Some(SimulationType::Exit));
        }
        Ok(SimulationType::from_input(&line))
    }

    /// Runs the selected scenario
    pub async fn run(&self, choice: SimulationType, config: &Config) -> Result<(), ConfigError> {
        match choice {
            SimulationType::VariateCheck => {
                variate_check::run_variate_check(config)?;
                println!("Variate check completed successfully!");
            }
            SimulationType::SweepInfiniteQueue => {
                sim_sweep_queue::run_sweep_infinite_queue(config).await?;
                println!("Infinite queue sweep completed successfully!");
            }
            SimulationType::SweepFiniteQueue => {
                sim_sweep_queue::run_sweep_finite_queue(config).await?;
                println!("Finite queue sweep completed successfully!");
            }
            SimulationType::SweepPersistentBus => {
                sim_sweep_bus::run_sweep_bus(config, SensingPolicy::Persistent).await?;
                println!("Persistent bus sweep completed successfully!");
            }
            SimulationType::SweepNonPersistentBus => {
                sim_sweep_bus::run_sweep_bus(config, SensingPolicy::NonPersistent).await?;
                println!("Non-persistent bus sweep completed successfully!");
            }
            SimulationType::RunAllTests => run_all_tests::run_all_tests(config).await?,
            SimulationType::Exit => println!("Exiting..."),
        }
        Ok(())
    }

    /// Shows the menu until a valid choice is made, then runs it
    pub async fn run_interactive(&self, config: &Config) -> Result<(), ConfigError> {
        self.show_menu();
        let choice = {
            let mut input = io::stdin().lock();
            loop {
                match self.read_choice(&mut input)? {
                    Some(choice) => break choice,
                    None => {
                        println!("Invalid choice. Please enter 1, 2, 3, 4, 5, 6, or 0 to exit.");
                        println!("{}", self.get_menu_text());
                    }
                }
            }
        };
        self.run(choice, config).await
    }
}
