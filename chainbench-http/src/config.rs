//! Client-side view of the `http` configuration domain

use chainbench_config::domains::http::HttpConfig as HttpDomainConfig;
use std::time::Duration;

/// Settings the reqwest client is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    /// `false` accepts self-signed certificates
    pub verify_ssl: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpDomainConfig::default().into()
    }
}

impl From<HttpDomainConfig> for HttpConfig {
    fn from(domain: HttpDomainConfig) -> Self {
        let HttpDomainConfig {
            timeout,
            connect_timeout,
            user_agent,
            verify_ssl,
        } = domain;
        Self {
            timeout,
            connect_timeout,
            user_agent,
            verify_ssl,
        }
    }
}
