//! Nova server listing

use super::identity::Session;
use crate::error::{TelemetryError, TelemetryResult};
use chainbench_http::{HttpClient, HttpRequest};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

const SERVICE: &str = "nova";

/// Instance name to id, rebuilt on every fetch cycle.
///
/// When two instances share a name the later one wins; collisions are counted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceRegistry {
    instances: BTreeMap<String, String>,
    collisions: usize,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, id: impl Into<String>) {
        let name = name.into();
        let id = id.into();
        if let Some(previous) = self.instances.insert(name.clone(), id.clone()) {
            self.collisions += 1;
            warn!(
                "Duplicate instance name '{}': id {} replaces {}",
                name, id, previous
            );
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.instances.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Number of names that were seen more than once
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// `(name, id)` pairs ordered by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.instances
            .iter()
            .map(|(name, id)| (name.as_str(), id.as_str()))
    }
}

pub struct ComputeClient {
    http: Arc<dyn HttpClient>,
}

impl ComputeClient {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list_instances(&self, session: &Session) -> TelemetryResult<InstanceRegistry> {
        let url = format!("{}/servers", session.compute_endpoint.trim_end_matches('/'));
        let response = self
            .http
            .send(HttpRequest::get(url.clone()).header("X-Auth-Token", session.token.clone()))
            .await?;

        if !response.is_success() {
            return Err(TelemetryError::Status {
                service: SERVICE,
                status: response.status,
                url,
            });
        }

        let registry = parse_servers(&response.body)?;
        info!("Found {} instances", registry.len());
        Ok(registry)
    }
}

pub fn parse_servers(body: &JsonValue) -> TelemetryResult<InstanceRegistry> {
    let servers = body
        .get("servers")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| TelemetryError::malformed(SERVICE, "missing servers array"))?;

    let mut registry = InstanceRegistry::new();
    for server in servers {
        let name = server.get("name").and_then(JsonValue::as_str);
        let id = server.get("id").and_then(JsonValue::as_str);
        match (name, id) {
            (Some(name), Some(id)) => registry.insert(name, id),
            _ => return Err(TelemetryError::malformed(SERVICE, "server without name or id")),
        }
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_duplicate_name_keeps_last() {
        let body = json!({
            "servers": [
                {"id": "a1", "name": "vnf-fw"},
                {"id": "b2", "name": "vnf-lb"},
                {"id": "c3", "name": "vnf-fw"}
            ]
        });
        let registry = parse_servers(&body).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("vnf-fw"), Some("c3"));
        assert_eq!(registry.collisions(), 1);
    }

    #[test]
    fn test_empty_and_malformed() {
        let registry = parse_servers(&json!({"servers": []})).unwrap();
        assert!(registry.is_empty());
        assert!(parse_servers(&json!({"server": []})).is_err());
        assert!(parse_servers(&json!({"servers": [{"id": "x"}]})).is_err());
    }

    #[test]
    fn test_iteration_is_ordered_by_name() {
        let mut registry = InstanceRegistry::new();
        registry.insert("zeta", "1");
        registry.insert("alpha", "2");
        let names: Vec<_> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
