//! Gnocchi measures per instance metric

use super::identity::Session;
use crate::error::{TelemetryError, TelemetryResult};
use chainbench_core::{round2, TimeWindow};
use chainbench_http::{HttpClient, HttpRequest};
use chrono::SecondsFormat;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, warn};

const SERVICE: &str = "gnocchi";

pub struct GnocchiClient {
    http: Arc<dyn HttpClient>,
}

impl GnocchiClient {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Values of `metric` on `resource_id` within `window`, rounded to 2 decimals.
    ///
    /// A metric the resource does not carry (404) yields no values.
    pub async fn measures(
        &self,
        session: &Session,
        resource_id: &str,
        metric: &str,
        window: &TimeWindow,
    ) -> TelemetryResult<Vec<f64>> {
        let url = format!(
            "{}/v1/resource/generic/{}/metric/{}/measures",
            session.metric_endpoint.trim_end_matches('/'),
            resource_id,
            metric
        );

        let request = HttpRequest::get(url.clone())
            .header("X-Auth-Token", session.token.clone())
            .query("start", window.start.to_rfc3339_opts(SecondsFormat::Secs, true))
            .query("stop", window.end.to_rfc3339_opts(SecondsFormat::Secs, true));

        let response = self.http.send(request).await?;
        if response.status == 404 {
            warn!("Metric '{}' not found on resource {}", metric, resource_id);
            return Ok(Vec::new());
        }
        if !response.is_success() {
            return Err(TelemetryError::Status {
                service: SERVICE,
                status: response.status,
                url,
            });
        }

        let values = parse_measures(&response.body)?;
        debug!("{} on {}: {} points", metric, resource_id, values.len());
        Ok(values)
    }
}

/// Values from `[[timestamp, granularity, value], ...]`
pub fn parse_measures(body: &JsonValue) -> TelemetryResult<Vec<f64>> {
    let points = body
        .as_array()
        .ok_or_else(|| TelemetryError::malformed(SERVICE, "measures is not an array"))?;

    points
        .iter()
        .map(|point| {
            point
                .get(2)
                .and_then(JsonValue::as_f64)
                .map(round2)
                .ok_or_else(|| {
                    TelemetryError::malformed(SERVICE, format!("unexpected point {}", point))
                })
        })
        .collect()
}
