//! Keystone v3 password authentication and service catalog lookup

use crate::error::{TelemetryError, TelemetryResult};
use chainbench_config::OpenStackConfig;
use chainbench_http::{HttpClient, HttpRequest};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use tracing::{debug, info};

const SERVICE: &str = "keystone";

/// An authenticated token with the endpoints it is valid for
#[derive(Clone)]
pub struct Session {
    pub token: String,
    pub compute_endpoint: String,
    pub metric_endpoint: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("compute_endpoint", &self.compute_endpoint)
            .field("metric_endpoint", &self.metric_endpoint)
            .finish()
    }
}

pub struct IdentityClient {
    http: Arc<dyn HttpClient>,
    config: OpenStackConfig,
}

impl IdentityClient {
    pub fn new(http: Arc<dyn HttpClient>, config: OpenStackConfig) -> Self {
        Self { http, config }
    }

    /// Request a project-scoped token and resolve compute/metric endpoints
    pub async fn authenticate(&self) -> TelemetryResult<Session> {
        let url = format!(
            "{}/auth/tokens",
            self.config.identity_endpoint.trim_end_matches('/')
        );
        info!("Authenticating against Keystone at {}", url);

        let response = self
            .http
            .send(HttpRequest::post(url.clone(), self.password_auth_body()))
            .await?;

        if !response.is_success() {
            return Err(TelemetryError::Status {
                service: SERVICE,
                status: response.status,
                url,
            });
        }

        let token = response
            .header("x-subject-token")
            .ok_or(TelemetryError::MissingToken)?
            .to_string();

        let catalog = response
            .body
            .pointer("/token/catalog")
            .cloned()
            .unwrap_or(JsonValue::Array(Vec::new()));
        let region = self.config.region.as_deref();

        let compute_endpoint = match self.config.compute_endpoint {
            Some(ref url) => url.clone(),
            None => find_endpoint(&catalog, "compute", region)?,
        };
        let metric_endpoint = match self.config.metric_endpoint {
            Some(ref url) => url.clone(),
            None => find_endpoint(&catalog, "metric", region)?,
        };

        debug!(
            "Keystone session: compute={} metric={}",
            compute_endpoint, metric_endpoint
        );

        Ok(Session {
            token,
            compute_endpoint,
            metric_endpoint,
        })
    }

    fn password_auth_body(&self) -> JsonValue {
        let credentials = &self.config.credentials;
        json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": credentials.username,
                            "domain": {"id": credentials.user_domain_id},
                            "password": credentials.password
                        }
                    }
                },
                "scope": {
                    "project": {
                        "name": credentials.project_name,
                        "domain": {"id": credentials.project_domain_id}
                    }
                }
            }
        })
    }
}

/// Public URL of `service_type` in a Keystone catalog, optionally per region
pub fn find_endpoint(
    catalog: &JsonValue,
    service_type: &str,
    region: Option<&str>,
) -> TelemetryResult<String> {
    let missing = || TelemetryError::MissingEndpoint {
        service_type: service_type.to_string(),
    };

    let entries = catalog
        .as_array()
        .ok_or_else(|| TelemetryError::malformed(SERVICE, "catalog is not an array"))?;

    entries
        .iter()
        .filter(|entry| entry.get("type").and_then(JsonValue::as_str) == Some(service_type))
        .filter_map(|entry| entry.get("endpoints").and_then(JsonValue::as_array))
        .flatten()
        .filter(|endpoint| endpoint.get("interface").and_then(JsonValue::as_str) == Some("public"))
        .filter(|endpoint| match region {
            Some(region) => {
                endpoint.get("region_id").and_then(JsonValue::as_str) == Some(region)
                    || endpoint.get("region").and_then(JsonValue::as_str) == Some(region)
            }
            None => true,
        })
        .find_map(|endpoint| endpoint.get("url").and_then(JsonValue::as_str))
        .map(|url| url.trim_end_matches('/').to_string())
        .ok_or_else(missing)
}
