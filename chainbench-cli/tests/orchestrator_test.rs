use anyhow::Result;
use async_trait::async_trait;
use chainbench::{Orchestrator, PhaseExecutor, PhaseSelection, PhaseTimings};
use chainbench_core::{LatencyResult, TimeWindow, TrafficMode, TrafficTestResult};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Traffic(TrafficMode),
    Latency,
    ReportTraffic(TrafficMode),
    ReportLatency,
    Snapshot {
        heading: String,
        window_secs: u64,
    },
    Countdown(u64),
    Timestamp,
}

fn snapshot(prefix: &str, tag: &str, window_secs: u64) -> Event {
    Event::Snapshot {
        heading: format!("{}|{}", prefix, tag),
        window_secs,
    }
}

fn fixed_end() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Records every effect and returns canned results
#[derive(Default)]
struct RecordingExecutor {
    events: Mutex<Vec<Event>>,
}

impl RecordingExecutor {
    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl PhaseExecutor for RecordingExecutor {
    fn announce(&self, _message: &str) {}

    async fn run_traffic(&self, mode: TrafficMode) -> Result<TrafficTestResult> {
        self.record(Event::Traffic(mode));
        Ok(TrafficTestResult {
            mode,
            protocol: "TCP".to_string(),
            streams: 1,
            window: TimeWindow::trailing(fixed_end(), Duration::from_secs(60)).unwrap(),
            throughput_mbps: vec![0.0],
            loss: None,
            bandwidth_target: None,
        })
    }

    async fn run_latency(&self) -> Result<LatencyResult> {
        self.record(Event::Latency);
        Ok(LatencyResult {
            window: TimeWindow::trailing(fixed_end(), Duration::from_secs(9)).unwrap(),
            probe_count: 10,
            min_ms: 0.1,
            avg_ms: 0.2,
            max_ms: 0.3,
            mdev_ms: 0.01,
        })
    }

    async fn report_traffic(&self, result: &TrafficTestResult) -> Result<()> {
        self.record(Event::ReportTraffic(result.mode));
        Ok(())
    }

    async fn report_latency(&self, _result: &LatencyResult) -> Result<()> {
        self.record(Event::ReportLatency);
        Ok(())
    }

    async fn snapshot(&self, prefix: &str, tag: &str, window: &TimeWindow) -> Result<()> {
        self.record(snapshot(prefix, tag, window.duration().as_secs()));
        Ok(())
    }

    async fn countdown(&self, duration: Duration) -> Result<TimeWindow> {
        self.record(Event::Countdown(duration.as_secs()));
        Ok(TimeWindow::trailing(fixed_end(), duration).unwrap())
    }

    async fn report_timestamp(&self, _run: &TimeWindow) -> Result<()> {
        self.record(Event::Timestamp);
        Ok(())
    }
}

fn timings() -> PhaseTimings {
    PhaseTimings {
        cooldown: Duration::from_secs(900),
        pre_run_wait: Duration::from_secs(3600),
        baseline_lookback: Duration::from_secs(3600),
    }
}

#[tokio::test]
async fn test_latency_only_runs_one_probe_and_no_snapshot() {
    let orchestrator = Orchestrator::new(RecordingExecutor::default(), timings());
    orchestrator
        .run(PhaseSelection {
            latency: true,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(
        orchestrator.executor().events(),
        vec![Event::Latency, Event::ReportLatency, Event::Timestamp]
    );
}

#[tokio::test]
async fn test_all_sequence_order() {
    let orchestrator = Orchestrator::new(RecordingExecutor::default(), timings());
    orchestrator
        .run(PhaseSelection {
            all: true,
            ..Default::default()
        })
        .await
        .unwrap();

    let expected = vec![
        Event::Latency,
        Event::ReportLatency,
        Event::Countdown(900),
        Event::Traffic(TrafficMode::Tcp),
        snapshot("ALL-TRAFFIC-TCP", "TCP", 60),
        Event::ReportTraffic(TrafficMode::Tcp),
        Event::Countdown(900),
        snapshot("ALL-TRAFFIC-TCP", "AFTER TCP", 900),
        Event::Traffic(TrafficMode::Stream),
        snapshot("ALL-TRAFFIC-TCP-STREAM", "TCP-Stream", 60),
        Event::ReportTraffic(TrafficMode::Stream),
        Event::Countdown(900),
        snapshot("ALL-TRAFFIC-TCP-STREAM", "AFTER TCP-STREAM", 900),
        Event::Traffic(TrafficMode::Udp),
        snapshot("ALL-TRAFFIC-UDP", "UDP", 60),
        Event::ReportTraffic(TrafficMode::Udp),
        Event::Timestamp,
    ];
    assert_eq!(orchestrator.executor().events(), expected);
}

#[tokio::test]
async fn test_flags_run_in_fixed_order() {
    let orchestrator = Orchestrator::new(RecordingExecutor::default(), timings());
    // Selection order on the command line does not matter
    orchestrator
        .run(PhaseSelection {
            udp: true,
            baseline: true,
            wait: true,
            tcp: true,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(
        orchestrator.executor().events(),
        vec![
            Event::Countdown(3600),
            snapshot("BASELINE", "", 3600),
            Event::Traffic(TrafficMode::Tcp),
            snapshot("TRAFFIC-TCP", "TCP", 60),
            Event::ReportTraffic(TrafficMode::Tcp),
            Event::Traffic(TrafficMode::Udp),
            snapshot("TRAFFIC-UDP", "UDP", 60),
            Event::ReportTraffic(TrafficMode::Udp),
            Event::Timestamp,
        ]
    );
}

#[tokio::test]
async fn test_no_phase_still_writes_timestamp() {
    let orchestrator = Orchestrator::new(RecordingExecutor::default(), timings());
    orchestrator.run(PhaseSelection::default()).await.unwrap();
    assert_eq!(orchestrator.executor().events(), vec![Event::Timestamp]);
}

#[tokio::test]
async fn test_baseline_lookback_out_of_range_fails_without_snapshot() {
    let mut timings = timings();
    timings.baseline_lookback = Duration::from_secs(10_000_000_000_000);
    let orchestrator = Orchestrator::new(RecordingExecutor::default(), timings);

    let err = orchestrator
        .run(PhaseSelection {
            baseline: true,
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(err.to_string().contains("baseline lookback"));
    assert!(orchestrator.executor().events().is_empty());
}
