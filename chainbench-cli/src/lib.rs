//! Command-line front end and phase orchestration for chainbench

pub mod cli;
pub mod executor;
pub mod orchestrator;

pub use cli::{log_config_warnings, Cli};
pub use executor::LiveExecutor;
pub use orchestrator::{AllPhase, Orchestrator, PhaseExecutor, PhaseSelection, PhaseTimings};
