use chainbench_config::ReportConfig;
use chainbench_core::{TimeWindow, TrafficMode, TrafficTestResult};
use chainbench_output::{infra_metrics_body, traffic_table, ReportWriter};
use chainbench_telemetry::InfraSnapshot;
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

fn writer(dir: &TempDir) -> ReportWriter {
    let config = ReportConfig {
        directory: dir.path().to_path_buf(),
        echo_stdout: false,
        ..Default::default()
    };
    ReportWriter::from_config("chain-a", &config)
}

#[tokio::test]
async fn test_phase_blocks_accumulate_in_order() {
    let dir = TempDir::new().unwrap();
    let writer = writer(&dir);
    let window = TimeWindow::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap(),
    );

    let result = TrafficTestResult {
        mode: TrafficMode::Tcp,
        protocol: "TCP".to_string(),
        streams: 1,
        window,
        throughput_mbps: vec![941.0, 933.5, 939.0, 925.25, 940.0],
        loss: None,
        bandwidth_target: None,
    };

    writer
        .write(
            "TRAFFIC-TCP|TCP Gnocchi Metric",
            &window,
            &infra_metrics_body(&InfraSnapshot::NoInstances),
        )
        .await
        .unwrap();
    writer
        .write(
            TrafficMode::Tcp.heading(),
            &window,
            &traffic_table(&result).to_string(),
        )
        .await
        .unwrap();

    let content = std::fs::read_to_string(dir.path().join("chain-a.output")).unwrap();
    let gnocchi = content.find("Heading: TRAFFIC-TCP|TCP Gnocchi Metric").unwrap();
    let traffic = content.find("Heading: Iperf TCP testing").unwrap();
    assert!(gnocchi < traffic);

    assert!(content.contains("Results: \nError\n"));
    assert!(content.contains("Throughput [Mbits/Sec]"));
    assert!(content.contains("935.75"));
    assert!(content.contains("941.0"));
    assert!(content.contains("925.25"));
    assert_eq!(content.matches(&"*".repeat(50)).count(), 2);
}
