//! Configuration loading and environment variable handling

use crate::domains::ChainbenchConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "CHAINBENCH".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<ChainbenchConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: ChainbenchConfig = serde_yaml::from_str(&content)?;

        let password_in_file = config
            .telemetry
            .openstack
            .as_ref()
            .is_some_and(|os| !os.credentials.password.is_empty());
        if password_in_file {
            config.load_notices.push(format!(
                "OpenStack password read from config file; prefer {}_OPENSTACK_PASSWORD",
                self.prefix
            ));
        }

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<ChainbenchConfig> {
        let mut config = ChainbenchConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<ChainbenchConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut ChainbenchConfig) -> ConfigResult<()> {
        self.apply_target_overrides(&mut config.target);
        self.apply_traffic_overrides(&mut config.traffic)?;
        self.apply_telemetry_overrides(&mut config.telemetry);
        self.apply_http_overrides(&mut config.http)?;
        self.apply_logging_overrides(&mut config.logging)?;
        self.apply_report_overrides(&mut config.report);
        Ok(())
    }

    fn apply_target_overrides(&self, config: &mut crate::domains::target::TargetConfig) {
        if let Ok(host) = self.get_env_var("TARGET_HOST") {
            config.host = host;
        }
    }

    /// Apply traffic timing overrides
    fn apply_traffic_overrides(
        &self,
        config: &mut crate::domains::traffic::TrafficConfig,
    ) -> ConfigResult<()> {
        if let Ok(duration) = self.get_env_var("TEST_DURATION_SECONDS") {
            config.test_duration = self.parse_seconds("TEST_DURATION_SECONDS", &duration)?;
        }

        if let Ok(cooldown) = self.get_env_var("COOLDOWN_SECONDS") {
            config.cooldown = self.parse_seconds("COOLDOWN_SECONDS", &cooldown)?;
        }

        Ok(())
    }

    /// Apply Prometheus and OpenStack overrides
    ///
    /// Setting any OpenStack variable enables the OpenStack section with
    /// defaults for the rest.
    fn apply_telemetry_overrides(&self, config: &mut crate::domains::telemetry::TelemetryConfig) {
        if let Ok(endpoint) = self.get_env_var("PROMETHEUS_ENDPOINT") {
            config.prometheus.endpoint = endpoint;
        }

        let identity = self.get_env_var("IDENTITY_ENDPOINT").ok();
        let username = self.get_env_var("OPENSTACK_USERNAME").ok();
        let password = self.get_env_var("OPENSTACK_PASSWORD").ok();

        if identity.is_none() && username.is_none() && password.is_none() {
            return;
        }

        let openstack = config.openstack.get_or_insert_with(Default::default);
        if let Some(identity) = identity {
            openstack.identity_endpoint = identity;
        }
        if let Some(username) = username {
            openstack.credentials.username = username;
        }
        if let Some(password) = password {
            openstack.credentials.password = password;
        }
    }

    /// Apply HTTP config overrides
    fn apply_http_overrides(
        &self,
        config: &mut crate::domains::http::HttpConfig,
    ) -> ConfigResult<()> {
        if let Ok(timeout) = self.get_env_var("HTTP_TIMEOUT") {
            config.timeout = self.parse_seconds("HTTP_TIMEOUT", &timeout)?;
        }

        if let Ok(verify_ssl) = self.get_env_var("HTTP_VERIFY_SSL") {
            config.verify_ssl = verify_ssl
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid HTTP_VERIFY_SSL: {}", e)))?;
        }

        Ok(())
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            use std::str::FromStr;
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            use std::str::FromStr;
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    fn apply_report_overrides(&self, config: &mut crate::domains::report::ReportConfig) {
        if let Ok(dir) = self.get_env_var("REPORT_DIR") {
            config.directory = PathBuf::from(dir);
        }
    }

    fn parse_seconds(&self, name: &str, value: &str) -> ConfigResult<Duration> {
        let seconds: u64 = value
            .parse()
            .map_err(|e| ConfigError::EnvError(format!("Invalid {}: {}", name, e)))?;
        Ok(Duration::from_secs(seconds))
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_env() {
        temp_env::with_vars_unset(
            [
                "CBTEST_TARGET_HOST",
                "CBTEST_IDENTITY_ENDPOINT",
                "CBTEST_OPENSTACK_USERNAME",
                "CBTEST_OPENSTACK_PASSWORD",
            ],
            || {
                let config = ConfigLoader::with_prefix("CBTEST").from_env().unwrap();
                assert_eq!(config.target.host, "127.0.0.1");
                assert!(config.telemetry.openstack.is_none());
            },
        );
    }

    #[test]
    fn test_invalid_seconds_override() {
        temp_env::with_var("CBTEST2_COOLDOWN_SECONDS", Some("soon"), || {
            let result = ConfigLoader::with_prefix("CBTEST2").from_env();
            assert!(matches!(result, Err(ConfigError::EnvError(_))));
        });
    }

    #[test]
    fn test_password_override_enables_openstack() {
        temp_env::with_vars(
            [
                ("CBTEST3_OPENSTACK_PASSWORD", Some("s3cret")),
                (
                    "CBTEST3_IDENTITY_ENDPOINT",
                    Some("http://10.0.0.5/identity/v3"),
                ),
            ],
            || {
                let config = ConfigLoader::with_prefix("CBTEST3").from_env().unwrap();
                let openstack = config.telemetry.openstack.unwrap();
                assert_eq!(openstack.credentials.password, "s3cret");
                assert_eq!(openstack.credentials.username, "admin");
                assert_eq!(openstack.identity_endpoint, "http://10.0.0.5/identity/v3");
            },
        );
    }
}
