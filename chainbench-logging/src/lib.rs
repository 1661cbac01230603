//! Tracing setup for chainbench
//!
//! Console output goes to stderr so stdout stays reserved for report echo and
//! countdowns. File targets are written through `tracing-appender`.

pub mod init;

pub use init::{init_logging_from_config, init_simple_tracing, resolve_directive, LoggingGuard};
