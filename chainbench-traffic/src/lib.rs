//! Traffic generation for chainbench
//!
//! Runs `ping` and `iperf3` as subprocesses, records the time window each
//! run covers and parses the captured output into core result types.

pub mod error;
pub mod generator;
pub mod parse;
pub mod runner;

pub use error::{TrafficError, TrafficResult};
pub use generator::TrafficGenerator;
pub use parse::{parse_ping, JsonOutputParser, OutputParser, TextOutputParser};
pub use runner::{CommandOutput, CommandRunner, CommandSpec, TokioCommandRunner};
