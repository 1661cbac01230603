use async_trait::async_trait;
use chainbench_config::{TargetConfig, TrafficConfig};
use chainbench_core::{TimeWindow, TrafficMode};
use chainbench_traffic::{
    parse_ping, CommandOutput, CommandRunner, CommandSpec, JsonOutputParser, OutputParser,
    TextOutputParser, TrafficGenerator, TrafficResult,
};
use chrono::Utc;
use std::sync::{Arc, Mutex};

const IPERF_TCP: &str = include_str!("fixtures/iperf_tcp.txt");
const IPERF_UDP: &str = include_str!("fixtures/iperf_udp.txt");
const IPERF_UDP_JSON: &str = include_str!("fixtures/iperf_udp.json");
const PING: &str = include_str!("fixtures/ping.txt");

fn window() -> TimeWindow {
    TimeWindow::since(Utc::now())
}

#[test]
fn test_text_tcp_fixture() {
    let result = TextOutputParser
        .parse(TrafficMode::Tcp, IPERF_TCP, window())
        .unwrap();

    assert_eq!(result.protocol, "TCP");
    assert_eq!(result.streams, 1);
    assert_eq!(
        result.throughput_mbps,
        vec![941.0, 933.5, 939.0, 925.25, 940.0]
    );
    assert_eq!(result.loss, None);

    let summary = result.throughput();
    assert_eq!(summary.max, 941.0);
    assert_eq!(summary.min, 925.25);
    assert_eq!(summary.average, 935.75);
}

#[test]
fn test_text_udp_fixture() {
    let result = TextOutputParser
        .parse(TrafficMode::Udp, IPERF_UDP, window())
        .unwrap();

    assert_eq!(result.protocol, "UDP");
    // five Mbits/sec lines, trailing one dropped
    assert_eq!(result.throughput_mbps, vec![956.0, 948.4, 955.0, 953.0]);
    assert_eq!(result.loss.as_deref(), Some("0%"));
}

#[test]
fn test_json_udp_fixture() {
    let result = JsonOutputParser
        .parse(TrafficMode::Udp, IPERF_UDP_JSON, window())
        .unwrap();

    assert_eq!(result.protocol, "UDP");
    assert_eq!(result.streams, 1);
    assert_eq!(result.throughput_mbps, vec![956.28, 948.38, 955.46]);
    assert_eq!(result.loss.as_deref(), Some("0.85%"));
}

#[test]
fn test_ping_fixture() {
    let latency = parse_ping(PING, window(), 10).unwrap();
    let summary = latency.summary();
    assert_eq!(summary.min, 0.366);
    assert_eq!(summary.average, 0.405);
    assert_eq!(summary.max, 0.501);
    assert_eq!(latency.mdev_ms, 0.035);
    assert_eq!(latency.probe_count, 10);
}

struct FixtureRunner {
    calls: Mutex<Vec<CommandSpec>>,
}

#[async_trait]
impl CommandRunner for FixtureRunner {
    async fn run(&self, spec: &CommandSpec) -> TrafficResult<CommandOutput> {
        self.calls.lock().unwrap().push(spec.clone());
        let stdout = if spec.program == "ping" {
            PING
        } else if spec.args.iter().any(|a| a == "-u") {
            IPERF_UDP
        } else {
            IPERF_TCP
        };
        Ok(CommandOutput {
            success: true,
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }
}

#[tokio::test]
async fn test_generator_runs_one_ping_and_sets_udp_bandwidth() {
    let runner = Arc::new(FixtureRunner {
        calls: Mutex::new(Vec::new()),
    });
    let generator = TrafficGenerator::new(
        runner.clone(),
        TargetConfig {
            host: "2.2.2.2".to_string(),
            ..Default::default()
        },
        TrafficConfig::default(),
    );

    let latency = generator.latency().await.unwrap();
    assert_eq!(latency.max_ms, 0.501);
    {
        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, vec!["-c", "10", "2.2.2.2"]);
    }

    let udp = generator.run(TrafficMode::Udp).await.unwrap();
    assert_eq!(udp.bandwidth_target.as_deref(), Some("1G"));
    assert!(udp.details().ends_with("\n Bandwidth Set: 1G"));
    assert_eq!(runner.calls.lock().unwrap().len(), 2);
}
