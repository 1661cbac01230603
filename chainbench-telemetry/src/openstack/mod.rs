//! OpenStack instance metrics: Keystone auth, Nova listing, Gnocchi measures

pub mod compute;
pub mod gnocchi;
pub mod identity;

pub use compute::{ComputeClient, InstanceRegistry};
pub use gnocchi::GnocchiClient;
pub use identity::{IdentityClient, Session};

use crate::error::TelemetryResult;
use chainbench_config::OpenStackConfig;
use chainbench_core::{MetricReading, ReducedMetric, TimeWindow};
use chainbench_http::HttpClient;
use std::sync::Arc;
use tracing::info;

/// Reduced Gnocchi metrics for one instance
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceMetrics {
    pub instance: String,
    pub metrics: Vec<ReducedMetric>,
}

/// Outcome of one infrastructure fetch cycle
#[derive(Debug, Clone, PartialEq)]
pub enum InfraSnapshot {
    Instances(Vec<InstanceMetrics>),
    /// Nova listed no instances; no measures were requested
    NoInstances,
}

/// Runs a full fetch cycle: authenticate, list instances, pull measures
pub struct OpenStackCollector {
    identity: IdentityClient,
    compute: ComputeClient,
    gnocchi: GnocchiClient,
    metrics: Vec<String>,
}

impl OpenStackCollector {
    pub fn new(http: Arc<dyn HttpClient>, config: OpenStackConfig) -> Self {
        let metrics = config.metrics.clone();
        Self {
            identity: IdentityClient::new(http.clone(), config),
            compute: ComputeClient::new(http.clone()),
            gnocchi: GnocchiClient::new(http),
            metrics,
        }
    }

    pub async fn collect(&self, window: &TimeWindow) -> TelemetryResult<InfraSnapshot> {
        let session = self.identity.authenticate().await?;
        let registry = self.compute.list_instances(&session).await?;

        if registry.is_empty() {
            info!("No instances listed; skipping Gnocchi measures");
            return Ok(InfraSnapshot::NoInstances);
        }

        let mut instances = Vec::with_capacity(registry.len());
        for (name, id) in registry.iter() {
            let mut metrics = Vec::with_capacity(self.metrics.len());
            for metric in &self.metrics {
                let values = self.gnocchi.measures(&session, id, metric, window).await?;
                metrics.push(ReducedMetric::new(
                    metric.as_str(),
                    MetricReading::from_samples(&values),
                ));
            }
            instances.push(InstanceMetrics {
                instance: name.to_string(),
                metrics,
            });
        }

        Ok(InfraSnapshot::Instances(instances))
    }
}
