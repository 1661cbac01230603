use chainbench_config::PrometheusConfig;
use chainbench_core::{MetricReading, TimeWindow};
use chainbench_http::{HttpClient, HttpManager};
use chainbench_telemetry::{PrometheusClient, TelemetryError};
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn window() -> TimeWindow {
    TimeWindow::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap(),
    )
}

fn client(server: &MockServer) -> PrometheusClient {
    let http: Arc<dyn HttpClient> = Arc::new(HttpManager::new().unwrap());
    PrometheusClient::new(
        http,
        PrometheusConfig {
            endpoint: format!("{}/", server.uri()),
            ..Default::default()
        },
    )
}

fn series(values: &[&str]) -> serde_json::Value {
    let values: Vec<_> = values
        .iter()
        .enumerate()
        .map(|(i, v)| json!([1709294400 + i * 5, v]))
        .collect();
    json!({
        "status": "success",
        "data": {"resultType": "matrix", "result": [{"metric": {}, "values": values}]}
    })
}

#[tokio::test]
async fn test_host_metrics_reduces_each_signal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/query_range"))
        .and(query_param("step", "5"))
        .and(query_param("timeout", "60s"))
        .and(query_param("start", "1709294400.000"))
        .and(query_param("end", "1709298000.000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(series(&["10", "20.5", "30"])))
        .expect(4)
        .mount(&server)
        .await;

    let metrics = client(&server).host_metrics(&window()).await.unwrap();

    assert_eq!(metrics.len(), 4);
    assert_eq!(metrics[0].name, "cpu_utilization [%]");
    assert_eq!(metrics[3].name, "System_Load 5 m [%]");
    match metrics[1].reading {
        MetricReading::Reduced(summary) => {
            assert_eq!(summary.max, 30.0);
            assert_eq!(summary.min, 10.0);
            assert_eq!(summary.average, 20.17);
        }
        MetricReading::Unavailable => panic!("expected reduced reading"),
    }
}

#[tokio::test]
async fn test_empty_series_fails_fast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/query_range"))
        .respond_with(ResponseTemplate::new(200).set_body_json(series(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).host_metrics(&window()).await;
    assert!(matches!(
        result,
        Err(TelemetryError::EmptySeries { metric }) if metric == "cpu_utilization [%]"
    ));
}

#[tokio::test]
async fn test_server_error_is_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/query_range"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client(&server).query_range("up", &window()).await;
    assert!(matches!(
        result,
        Err(TelemetryError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_http_error() {
    let http: Arc<dyn HttpClient> = Arc::new(HttpManager::new().unwrap());
    let client = PrometheusClient::new(
        http,
        PrometheusConfig {
            endpoint: "http://127.0.0.1:1/".to_string(),
            ..Default::default()
        },
    );
    let result = client.query_range("up", &window()).await;
    assert!(matches!(result, Err(TelemetryError::Http(_))));
}
