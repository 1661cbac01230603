//! Domain-specific configuration modules

pub mod http;
pub mod logging;
pub mod report;
pub mod target;
pub mod telemetry;
pub mod traffic;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main chainbench configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChainbenchConfig {
    /// Traffic target (iperf3 server / ping destination)
    #[serde(default)]
    pub target: target::TargetConfig,

    /// Test durations, cooldowns and traffic shape
    #[serde(default)]
    pub traffic: traffic::TrafficConfig,

    /// Metrics sources
    #[serde(default)]
    pub telemetry: telemetry::TelemetryConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Run log configuration
    #[serde(default)]
    pub report: report::ReportConfig,

    /// Findings made while loading, before any logger exists
    #[serde(skip)]
    pub(crate) load_notices: Vec<String>,
}

impl ChainbenchConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.target.validate()?;
        self.traffic.validate()?;
        self.telemetry.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        self.report.validate()?;
        Ok(())
    }

    /// Warnings from loading and from every domain, for logging once the
    /// subscriber is installed
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = self.load_notices.clone();
        warnings.extend(self.traffic.warnings());
        warnings.extend(self.http.warnings());
        warnings
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let mut config = ChainbenchConfig::default();
        config.telemetry.openstack = Some(telemetry::OpenStackConfig::default());
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
