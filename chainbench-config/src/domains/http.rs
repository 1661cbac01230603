//! Settings for requests to Prometheus, Keystone, Nova and Gnocchi

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One client serves every metric endpoint, so these apply to all of them.
/// Requests are never retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request deadline
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub timeout: Duration,

    /// TCP/TLS connect deadline; an unreachable endpoint fails after this
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub connect_timeout: Duration,

    pub user_agent: String,

    /// Lab clouds often run self-signed Keystone certificates
    #[serde(default = "crate::domains::utils::default_true")]
    pub verify_ssl: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            user_agent: format!("chainbench/{}", env!("CARGO_PKG_VERSION")),
            verify_ssl: true,
        }
    }
}

impl Validatable for HttpConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.timeout.as_secs(), "timeout", self.domain_name())?;
        validate_positive(
            self.connect_timeout.as_secs(),
            "connect_timeout",
            self.domain_name(),
        )?;
        validate_required_string(&self.user_agent, "user_agent", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "http"
    }

    fn warnings(&self) -> Vec<String> {
        if self.verify_ssl {
            Vec::new()
        } else {
            vec!["TLS certificate verification is disabled for metric endpoints".to_string()]
        }
    }
}
