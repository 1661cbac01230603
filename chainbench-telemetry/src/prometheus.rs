//! Host metrics from node_exporter through the Prometheus range-query API.

use crate::error::{TelemetryError, TelemetryResult};
use chainbench_config::PrometheusConfig;
use chainbench_core::{reduce, ReducedMetric, TimeWindow};
use chainbench_http::{HttpClient, HttpRequest};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, info};

const SERVICE: &str = "prometheus";

/// A named PromQL expression producing one host signal
#[derive(Debug, Clone, PartialEq)]
pub struct HostMetricQuery {
    pub name: &'static str,
    pub expr: String,
}

/// The four host signals, scoped to one node_exporter instance
pub fn host_metric_queries(instance: &str, job: &str) -> Vec<HostMetricQuery> {
    let sel = format!("instance=~\"{}\",job=~\"{}\"", instance, job);
    let cpu_count = format!("count(count(node_cpu_seconds_total{{{}}}) by (cpu))", sel);

    vec![
        HostMetricQuery {
            name: "cpu_utilization [%]",
            expr: format!(
                "((({cpus}) - avg(sum by (mode)(irate(node_cpu_seconds_total{{mode='idle',{sel}}}[5m])))) * 100) / {cpus}",
                cpus = cpu_count,
                sel = sel
            ),
        },
        HostMetricQuery {
            name: "ram_utilization [%]",
            expr: format!(
                "100 - ((node_memory_MemAvailable_bytes{{{sel}}} * 100) / node_memory_MemTotal_bytes{{{sel}}})",
                sel = sel
            ),
        },
        HostMetricQuery {
            name: "System_Load [%]",
            expr: format!("avg(node_load1{{{}}}) / {} * 100", sel, cpu_count),
        },
        HostMetricQuery {
            name: "System_Load 5 m [%]",
            expr: format!("avg(node_load5{{{}}}) / {} * 100", sel, cpu_count),
        },
    ]
}

/// Range-query client for a Prometheus-compatible API
pub struct PrometheusClient {
    http: Arc<dyn HttpClient>,
    config: PrometheusConfig,
}

impl PrometheusClient {
    pub fn new(http: Arc<dyn HttpClient>, config: PrometheusConfig) -> Self {
        Self { http, config }
    }

    fn query_range_url(&self) -> String {
        format!(
            "{}/api/v1/query_range",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    /// Samples of the first series `query` yields over `window`
    pub async fn query_range(&self, query: &str, window: &TimeWindow) -> TelemetryResult<Vec<f64>> {
        let url = self.query_range_url();
        debug!("Prometheus query_range: {}", query);

        let request = HttpRequest::get(url.clone())
            .query("query", query)
            .query("start", format!("{:.3}", window.start_epoch()))
            .query("end", format!("{:.3}", window.end_epoch()))
            .query("step", self.config.step_seconds)
            .query("timeout", format!("{}s", self.config.query_timeout.as_secs()));

        let response = self.http.send(request).await?;
        if !response.is_success() {
            return Err(TelemetryError::Status {
                service: SERVICE,
                status: response.status,
                url,
            });
        }

        parse_query_range(&response.body, query)
    }

    /// Reduced host metrics over `window`, one row per signal
    pub async fn host_metrics(&self, window: &TimeWindow) -> TelemetryResult<Vec<ReducedMetric>> {
        let queries = host_metric_queries(&self.config.instance, &self.config.job);
        let mut metrics = Vec::with_capacity(queries.len());

        for query in queries {
            let samples = self.query_range(&query.expr, window).await?;
            let summary = reduce(&samples).ok_or_else(|| TelemetryError::EmptySeries {
                metric: query.name.to_string(),
            })?;
            debug!(
                "{}: max={} min={} avg={} over {} samples",
                query.name,
                summary.max,
                summary.min,
                summary.average,
                samples.len()
            );
            metrics.push(ReducedMetric::reduced(query.name, summary));
        }

        info!("Collected {} host metrics from Prometheus", metrics.len());
        Ok(metrics)
    }
}

/// Extract the values of the first series from a `query_range` body
pub fn parse_query_range(body: &JsonValue, query: &str) -> TelemetryResult<Vec<f64>> {
    let result = body
        .pointer("/data/result")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| TelemetryError::malformed(SERVICE, "missing data.result array"))?;

    let series = result.first().ok_or_else(|| TelemetryError::EmptyResult {
        query: query.to_string(),
    })?;

    let values = series
        .get("values")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| TelemetryError::malformed(SERVICE, "series has no values array"))?;

    values
        .iter()
        .map(|pair| {
            let value = pair
                .get(1)
                .ok_or_else(|| TelemetryError::malformed(SERVICE, "sample is not a [ts, value] pair"))?;
            sample_value(value)
        })
        .collect()
}

fn sample_value(value: &JsonValue) -> TelemetryResult<f64> {
    match value {
        JsonValue::String(s) => s
            .parse::<f64>()
            .map_err(|e| TelemetryError::malformed(SERVICE, format!("sample '{}': {}", s, e))),
        JsonValue::Number(n) => n
            .as_f64()
            .ok_or_else(|| TelemetryError::malformed(SERVICE, format!("sample {}", n))),
        other => Err(TelemetryError::malformed(
            SERVICE,
            format!("unexpected sample {}", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_queries_use_selector() {
        let queries = host_metric_queries("localhost:9100", "node_exporter");
        let names: Vec<_> = queries.iter().map(|q| q.name).collect();
        assert_eq!(
            names,
            vec![
                "cpu_utilization [%]",
                "ram_utilization [%]",
                "System_Load [%]",
                "System_Load 5 m [%]"
            ]
        );
        for query in &queries {
            assert!(query
                .expr
                .contains("instance=~\"localhost:9100\",job=~\"node_exporter\""));
        }
        assert!(queries[2].expr.starts_with("avg(node_load1{"));
        assert!(queries[3].expr.starts_with("avg(node_load5{"));
        assert!(queries[0].expr.contains("mode='idle'"));
    }

    #[test]
    fn test_parse_first_series_only() {
        let body = json!({
            "status": "success",
            "data": {
                "resultType": "matrix",
                "result": [
                    {"metric": {}, "values": [[1700000000, "12.5"], [1700000005, "13"]]},
                    {"metric": {}, "values": [[1700000000, "99"]]}
                ]
            }
        });
        assert_eq!(parse_query_range(&body, "q").unwrap(), vec![12.5, 13.0]);
    }

    #[test]
    fn test_parse_empty_result() {
        let body = json!({"data": {"result": []}});
        assert!(matches!(
            parse_query_range(&body, "up"),
            Err(TelemetryError::EmptyResult { query }) if query == "up"
        ));
    }

    #[test]
    fn test_parse_malformed() {
        let body = json!({"error": "bad_data"});
        assert!(matches!(
            parse_query_range(&body, "q"),
            Err(TelemetryError::MalformedResponse { .. })
        ));

        let body = json!({"data": {"result": [{"values": [[1, "NaN-ish"]]}]}});
        assert!(matches!(
            parse_query_range(&body, "q"),
            Err(TelemetryError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_parse_empty_values() {
        let body = json!({"data": {"result": [{"values": []}]}});
        assert!(parse_query_range(&body, "q").unwrap().is_empty());
    }
}
