//! Traffic shape and phase timing configuration

use crate::error::ConfigResult;
use crate::validation::{validate_bitrate, validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// iperf3 refuses more parallel streams than this
pub const MAX_PARALLEL_STREAMS: u32 = 128;

/// Longest baseline lookback accepted, one year
pub const MAX_BASELINE_LOOKBACK: Duration = Duration::from_secs(365 * 24 * 3600);

/// Durations and traffic parameters for every phase
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// iperf3 test duration (`-t`)
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_test_duration"
    )]
    pub test_duration: Duration,

    /// Wait between phases of the `all` sequence
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_cooldown"
    )]
    pub cooldown: Duration,

    /// Sleep before any phase when `--wait` is given
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_pre_run_wait"
    )]
    pub pre_run_wait: Duration,

    /// How far back the baseline snapshot looks
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_baseline_lookback"
    )]
    pub baseline_lookback: Duration,

    /// Number of ping probes for the latency phase
    #[serde(default = "default_ping_count")]
    pub ping_count: u32,

    /// Parallel streams for the TCP-stream phase (`-P`)
    #[serde(default = "default_stream_count")]
    pub stream_count: u32,

    /// Target bit rate for the UDP phase (`-b`)
    #[serde(default = "default_udp_bandwidth")]
    pub udp_bandwidth: String,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            test_duration: default_test_duration(),
            cooldown: default_cooldown(),
            pre_run_wait: default_pre_run_wait(),
            baseline_lookback: default_baseline_lookback(),
            ping_count: default_ping_count(),
            stream_count: default_stream_count(),
            udp_bandwidth: default_udp_bandwidth(),
        }
    }
}

impl Validatable for TrafficConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(
            self.test_duration.as_secs(),
            "test_duration",
            self.domain_name(),
        )?;
        validate_positive(
            self.baseline_lookback.as_secs(),
            "baseline_lookback",
            self.domain_name(),
        )?;
        validate_positive(self.ping_count, "ping_count", self.domain_name())?;
        validate_positive(self.stream_count, "stream_count", self.domain_name())?;
        validate_bitrate(&self.udp_bandwidth, "udp_bandwidth", self.domain_name())?;

        if self.stream_count > MAX_PARALLEL_STREAMS {
            return Err(self.validation_error(format!(
                "stream_count must be at most {}, got {}",
                MAX_PARALLEL_STREAMS, self.stream_count
            )));
        }

        if self.baseline_lookback > MAX_BASELINE_LOOKBACK {
            return Err(self.validation_error(format!(
                "baseline_lookback must be at most {}s, got {}s",
                MAX_BASELINE_LOOKBACK.as_secs(),
                self.baseline_lookback.as_secs()
            )));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "traffic"
    }

    fn warnings(&self) -> Vec<String> {
        if self.cooldown.is_zero() {
            vec!["cooldown is 0; post-phase snapshots will cover an empty window".to_string()]
        } else {
            Vec::new()
        }
    }
}

// Default value functions
fn default_test_duration() -> Duration {
    Duration::from_secs(3600)
}

fn default_cooldown() -> Duration {
    Duration::from_secs(900)
}

fn default_pre_run_wait() -> Duration {
    Duration::from_secs(3600)
}

fn default_baseline_lookback() -> Duration {
    Duration::from_secs(3600)
}

fn default_ping_count() -> u32 {
    10
}

fn default_stream_count() -> u32 {
    100
}

fn default_udp_bandwidth() -> String {
    "1G".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traffic_defaults() {
        let config = TrafficConfig::default();
        assert_eq!(config.test_duration, Duration::from_secs(3600));
        assert_eq!(config.cooldown, Duration::from_secs(900));
        assert_eq!(config.pre_run_wait, Duration::from_secs(3600));
        assert_eq!(config.baseline_lookback, Duration::from_secs(3600));
        assert_eq!(config.ping_count, 10);
        assert_eq!(config.stream_count, 100);
        assert_eq!(config.udp_bandwidth, "1G");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_traffic_validation() {
        let mut config = TrafficConfig::default();
        config.stream_count = 129;
        assert!(config.validate().is_err());

        config = TrafficConfig::default();
        config.test_duration = Duration::ZERO;
        assert!(config.validate().is_err());

        config = TrafficConfig::default();
        config.udp_bandwidth = "fast".to_string();
        assert!(config.validate().is_err());

        config = TrafficConfig::default();
        config.cooldown = Duration::ZERO;
        assert!(config.validate().is_ok());
        assert_eq!(config.warnings().len(), 1);
        assert!(TrafficConfig::default().warnings().is_empty());
    }

    #[test]
    fn test_baseline_lookback_is_capped() {
        let mut config = TrafficConfig::default();
        config.baseline_lookback = MAX_BASELINE_LOOKBACK;
        assert!(config.validate().is_ok());

        config.baseline_lookback = Duration::from_secs(10_000_000_000_000);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("baseline_lookback"));
    }

    #[test]
    fn test_durations_accept_suffixes() {
        let config: TrafficConfig =
            serde_yaml::from_str("test_duration: 10m\ncooldown: 30\n").unwrap();
        assert_eq!(config.test_duration, Duration::from_secs(600));
        assert_eq!(config.cooldown, Duration::from_secs(30));
        assert_eq!(config.ping_count, 10);
    }
}
