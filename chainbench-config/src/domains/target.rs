//! Traffic target configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Where traffic is sent and which binaries generate it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Address of the iperf3 server, also the ping destination
    #[serde(default = "default_host")]
    pub host: String,

    /// iperf3 binary name or path
    #[serde(default = "default_iperf_binary")]
    pub iperf_binary: String,

    /// ping binary name or path
    #[serde(default = "default_ping_binary")]
    pub ping_binary: String,

    /// How iperf3 output is requested and parsed
    #[serde(default)]
    pub output_format: IperfOutputFormat,
}

/// iperf3 output flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IperfOutputFormat {
    /// Verbose human-readable output, scraped by pattern
    #[default]
    Text,
    /// `-J` structured output
    Json,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            iperf_binary: default_iperf_binary(),
            ping_binary: default_ping_binary(),
            output_format: IperfOutputFormat::default(),
        }
    }
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.host, "host", self.domain_name())?;
        validate_required_string(&self.iperf_binary, "iperf_binary", self.domain_name())?;
        validate_required_string(&self.ping_binary, "ping_binary", self.domain_name())?;

        if self.host.starts_with('-') {
            return Err(self.validation_error(format!(
                "host '{}' would be read as a command-line flag",
                self.host
            )));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "target"
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_iperf_binary() -> String {
    "iperf3".to_string()
}

fn default_ping_binary() -> String {
    "ping".to_string()
}
