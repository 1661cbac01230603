//! Metrics source configuration: Prometheus and OpenStack

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, validate_url, Validatable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Gnocchi metrics collected per instance when none are configured
pub const DEFAULT_INSTANCE_METRICS: [&str; 8] = [
    "cpu_util",
    "disk.usage",
    "disk.allocation",
    "disk.root.size",
    "disk.capacity",
    "vcpus",
    "memory",
    "disk.ephemeral.size",
];

/// All metric sources
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Host metrics from node_exporter via Prometheus
    #[serde(default)]
    pub prometheus: PrometheusConfig,

    /// Instance metrics from OpenStack; skipped when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openstack: Option<OpenStackConfig>,
}

/// Prometheus range-query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrometheusConfig {
    /// Base URL, e.g. `http://172.16.218.20:9090/`
    #[serde(default = "default_prometheus_endpoint")]
    pub endpoint: String,

    /// node_exporter `instance` label matcher
    #[serde(default = "default_instance_label")]
    pub instance: String,

    /// node_exporter `job` label matcher
    #[serde(default = "default_job_label")]
    pub job: String,

    /// Query resolution step in seconds
    #[serde(default = "default_step")]
    pub step_seconds: u64,

    /// Server-side evaluation timeout passed with each query
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_query_timeout"
    )]
    pub query_timeout: Duration,
}

/// OpenStack identity, compute and metric settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenStackConfig {
    /// Keystone v3 base URL, e.g. `http://172.16.218.20/identity/v3`
    #[serde(default = "default_identity_endpoint")]
    pub identity_endpoint: String,

    /// Nova endpoint; discovered from the service catalog when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_endpoint: Option<String>,

    /// Gnocchi endpoint; discovered from the service catalog when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_endpoint: Option<String>,

    /// Catalog region filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Gnocchi metric names collected for every instance
    #[serde(default = "default_instance_metrics")]
    pub metrics: Vec<String>,
}

/// Keystone password credentials
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    #[serde(default = "default_admin")]
    pub username: String,

    /// Usually supplied through `CHAINBENCH_OPENSTACK_PASSWORD`
    #[serde(default)]
    pub password: String,

    #[serde(default = "default_admin")]
    pub project_name: String,

    #[serde(default = "default_domain")]
    pub user_domain_id: String,

    #[serde(default = "default_domain")]
    pub project_domain_id: String,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("project_name", &self.project_name)
            .field("user_domain_id", &self.user_domain_id)
            .field("project_domain_id", &self.project_domain_id)
            .finish()
    }
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            endpoint: default_prometheus_endpoint(),
            instance: default_instance_label(),
            job: default_job_label(),
            step_seconds: default_step(),
            query_timeout: default_query_timeout(),
        }
    }
}

impl Default for OpenStackConfig {
    fn default() -> Self {
        Self {
            identity_endpoint: default_identity_endpoint(),
            compute_endpoint: None,
            metric_endpoint: None,
            region: None,
            credentials: CredentialsConfig::default(),
            metrics: default_instance_metrics(),
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            username: default_admin(),
            password: String::new(),
            project_name: default_admin(),
            user_domain_id: default_domain(),
            project_domain_id: default_domain(),
        }
    }
}

impl Validatable for TelemetryConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.prometheus.validate()?;
        if let Some(ref openstack) = self.openstack {
            openstack.validate()?;
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "telemetry"
    }
}

impl Validatable for PrometheusConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.endpoint, "endpoint", self.domain_name())?;
        validate_required_string(&self.instance, "instance", self.domain_name())?;
        validate_required_string(&self.job, "job", self.domain_name())?;
        validate_positive(self.step_seconds, "step_seconds", self.domain_name())?;
        validate_positive(
            self.query_timeout.as_secs(),
            "query_timeout",
            self.domain_name(),
        )?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "telemetry.prometheus"
    }
}

impl Validatable for OpenStackConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(
            &self.identity_endpoint,
            "identity_endpoint",
            self.domain_name(),
        )?;
        if let Some(ref url) = self.compute_endpoint {
            validate_url(url, "compute_endpoint", self.domain_name())?;
        }
        if let Some(ref url) = self.metric_endpoint {
            validate_url(url, "metric_endpoint", self.domain_name())?;
        }
        if self.metrics.is_empty() {
            return Err(self.validation_error("metrics cannot be empty"));
        }
        for metric in &self.metrics {
            validate_required_string(metric, "metrics[]", self.domain_name())?;
        }
        self.credentials.validate()
    }

    fn domain_name(&self) -> &'static str {
        "telemetry.openstack"
    }
}

impl Validatable for CredentialsConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.username, "username", self.domain_name())?;
        validate_required_string(&self.password, "password", self.domain_name())?;
        validate_required_string(&self.project_name, "project_name", self.domain_name())?;
        validate_required_string(&self.user_domain_id, "user_domain_id", self.domain_name())?;
        validate_required_string(
            &self.project_domain_id,
            "project_domain_id",
            self.domain_name(),
        )?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "telemetry.openstack.credentials"
    }
}

// Default value functions
fn default_prometheus_endpoint() -> String {
    "http://127.0.0.1:9090/".to_string()
}

fn default_instance_label() -> String {
    "localhost:9100".to_string()
}

fn default_job_label() -> String {
    "node_exporter".to_string()
}

fn default_step() -> u64 {
    5
}

fn default_query_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_identity_endpoint() -> String {
    "http://127.0.0.1/identity/v3".to_string()
}

fn default_admin() -> String {
    "admin".to_string()
}

fn default_domain() -> String {
    "default".to_string()
}

fn default_instance_metrics() -> Vec<String> {
    DEFAULT_INSTANCE_METRICS.iter().map(|m| m.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prometheus_defaults() {
        let config = PrometheusConfig::default();
        assert_eq!(config.instance, "localhost:9100");
        assert_eq!(config.job, "node_exporter");
        assert_eq!(config.step_seconds, 5);
        assert_eq!(config.query_timeout, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_openstack_requires_password() {
        let mut config = OpenStackConfig::default();
        assert_eq!(config.metrics.len(), 8);
        assert!(config.validate().is_err());

        config.credentials.password = "secret".to_string();
        assert!(config.validate().is_ok());

        config.metrics.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = CredentialsConfig {
            password: "hunter2".to_string(),
            ..Default::default()
        };
        let rendered = format!("{:?}", credentials);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_telemetry_without_openstack_is_valid() {
        let config = TelemetryConfig::default();
        assert!(config.openstack.is_none());
        assert!(config.validate().is_ok());
    }
}
