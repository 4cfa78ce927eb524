pub mod sweep_runner;
pub mod variate_check;
pub mod sim_sweep_queue;
pub mod sim_sweep_bus;
pub mod run_all_tests;
