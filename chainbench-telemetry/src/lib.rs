//! Metric fetchers for chainbench
//!
//! Host metrics come from a Prometheus range-query API fed by node_exporter.
//! Per-instance metrics come from OpenStack Gnocchi, after Keystone
//! authentication and a Nova server listing. Both reduce a time window to
//! (max, min, average) rows.

pub mod error;
pub mod openstack;
pub mod prometheus;

pub use error::{TelemetryError, TelemetryResult};
pub use openstack::{InfraSnapshot, InstanceMetrics, InstanceRegistry, OpenStackCollector};
pub use prometheus::{host_metric_queries, HostMetricQuery, PrometheusClient};

use chainbench_config::TelemetryConfig;
use chainbench_core::{ReducedMetric, TimeWindow};
use chainbench_http::HttpClient;
use std::sync::Arc;
use tracing::debug;

/// All configured metric sources behind one handle
pub struct Telemetry {
    prometheus: PrometheusClient,
    openstack: Option<OpenStackCollector>,
}

impl Telemetry {
    pub fn from_config(http: Arc<dyn HttpClient>, config: &TelemetryConfig) -> Self {
        let openstack = config
            .openstack
            .clone()
            .map(|os| OpenStackCollector::new(http.clone(), os));
        Self {
            prometheus: PrometheusClient::new(http, config.prometheus.clone()),
            openstack,
        }
    }

    pub async fn host_metrics(&self, window: &TimeWindow) -> TelemetryResult<Vec<ReducedMetric>> {
        self.prometheus.host_metrics(window).await
    }

    /// `None` when OpenStack is not configured
    pub async fn infra_metrics(&self, window: &TimeWindow) -> TelemetryResult<Option<InfraSnapshot>> {
        match self.openstack {
            Some(ref collector) => collector.collect(window).await.map(Some),
            None => {
                debug!("OpenStack not configured; skipping instance metrics");
                Ok(None)
            }
        }
    }
}
