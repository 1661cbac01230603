//! CLI argument parsing definitions

use anyhow::{Context, Result};
use chainbench_config::{ChainbenchConfig, ConfigLoader};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::orchestrator::PhaseSelection;

#[derive(Parser, Debug)]
#[command(author, version, about = "Service-chain performance test orchestrator", long_about = None)]
pub struct Cli {
    /// Identifier for the run; names the run log
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Fetch baseline metrics without sending traffic
    #[arg(short, long)]
    pub baseline: bool,

    /// Send TCP traffic
    #[arg(short, long)]
    pub tcp: bool,

    /// Send TCP traffic over parallel streams
    #[arg(short, long)]
    pub stream: bool,

    /// Send UDP traffic
    #[arg(short, long)]
    pub udp: bool,

    /// Measure round-trip latency
    #[arg(short, long)]
    pub latency: bool,

    /// Run latency, TCP, TCP-stream and UDP in sequence with cooldowns
    #[arg(short, long)]
    pub all: bool,

    /// Wait before starting any phase
    #[arg(short, long)]
    pub wait: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Traffic target host, overrides the configuration
    #[arg(long, value_name = "HOST")]
    pub target: Option<String>,

    /// iperf3 test duration in seconds
    #[arg(long, value_name = "SECS")]
    pub duration: Option<u64>,

    /// Cooldown between phases of --all, in seconds
    #[arg(long, value_name = "SECS")]
    pub cooldown: Option<u64>,
}

impl Cli {
    pub fn phases(&self) -> PhaseSelection {
        PhaseSelection {
            wait: self.wait,
            baseline: self.baseline,
            tcp: self.tcp,
            stream: self.stream,
            udp: self.udp,
            latency: self.latency,
            all: self.all,
        }
    }

    /// Load the file or environment configuration, then apply flag overrides
    pub fn load_config(&self) -> Result<ChainbenchConfig> {
        let mut config = ConfigLoader::new()
            .load(self.config.as_ref())
            .context("Failed to load configuration")?;

        self.apply_overrides(&mut config);
        config
            .validate_all()
            .context("Invalid configuration after command-line overrides")?;
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut ChainbenchConfig) {
        if let Some(ref host) = self.target {
            config.target.host = host.clone();
        }
        if let Some(secs) = self.duration {
            config.traffic.test_duration = Duration::from_secs(secs);
        }
        if let Some(secs) = self.cooldown {
            config.traffic.cooldown = Duration::from_secs(secs);
        }
    }
}

/// Log the warnings collected while loading; call after logging is up
pub fn log_config_warnings(config: &ChainbenchConfig) -> usize {
    let warnings = config.warnings();
    for warning in &warnings {
        warn!("{}", warning);
    }
    warnings.len()
}
