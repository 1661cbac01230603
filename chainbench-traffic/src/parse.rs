//! Turning captured tool output into structured results.
//!
//! [`TextOutputParser`] scrapes iperf3's verbose human-readable output by
//! pattern. [`JsonOutputParser`] reads the `-J` document field by field.
//! Callers only see [`OutputParser`], so the two are interchangeable.

use crate::error::{TrafficError, TrafficResult};
use chainbench_core::{round2, LatencyResult, TimeWindow, TrafficMode, TrafficTestResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static TEST_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Starting Test: protocol: (.*?), (\d{1,3}) streams").expect("valid pattern")
});
static TCP_INTERVAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"  (\d+(?:\.\d+)?) Mbits/sec .*Bytes").expect("valid pattern"));
static UDP_INTERVAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"  (\d+(?:\.\d+)?) Mbits/sec").expect("valid pattern"));
static FIRST_PARENTHESIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((.*?)\)").expect("valid pattern"));
static PING_SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+\.\d+)/(\d+\.\d+)/(\d+\.\d+)/(\d+\.\d+)").expect("valid pattern")
});

/// Converts raw iperf3 stdout into a [`TrafficTestResult`]
pub trait OutputParser: Send + Sync {
    fn parse(
        &self,
        mode: TrafficMode,
        raw: &str,
        window: TimeWindow,
    ) -> TrafficResult<TrafficTestResult>;

    /// Extra iperf3 flags this parser needs
    fn extra_args(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Pattern-based scraper for `iperf3 -f m -V` output
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOutputParser;

impl TextOutputParser {
    /// Per-interval throughput. UDP drops the final match (the summary line).
    /// No matches yields `[0.0]`.
    pub fn throughput(mode: TrafficMode, raw: &str) -> Vec<f64> {
        let pattern = match mode {
            TrafficMode::Udp => &*UDP_INTERVAL,
            TrafficMode::Tcp | TrafficMode::Stream => &*TCP_INTERVAL,
        };

        let mut values: Vec<f64> = pattern
            .captures_iter(raw)
            .filter_map(|caps| caps[1].parse::<f64>().ok())
            .map(round2)
            .collect();

        if mode == TrafficMode::Udp {
            values.pop();
        }

        if values.is_empty() {
            vec![0.0]
        } else {
            values
        }
    }

    /// Contents of the first parenthesized expression, e.g. `0%`
    pub fn loss(raw: &str) -> Option<String> {
        FIRST_PARENTHESIZED
            .captures(raw)
            .map(|caps| caps[1].to_string())
    }
}

impl OutputParser for TextOutputParser {
    fn parse(
        &self,
        mode: TrafficMode,
        raw: &str,
        window: TimeWindow,
    ) -> TrafficResult<TrafficTestResult> {
        let caps = TEST_START.captures(raw).ok_or_else(|| {
            TrafficError::parse("iperf3 output", "no 'Starting Test' line")
        })?;
        let protocol = caps[1].to_string();
        let streams = caps[2]
            .parse::<u32>()
            .map_err(|e| TrafficError::parse("stream count", e.to_string()))?;

        Ok(TrafficTestResult {
            mode,
            protocol,
            streams,
            window,
            throughput_mbps: Self::throughput(mode, raw),
            loss: match mode {
                TrafficMode::Udp => Self::loss(raw),
                _ => None,
            },
            bandwidth_target: None,
        })
    }
}

#[derive(Debug, Deserialize)]
struct IperfReport {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    start: IperfStart,
    #[serde(default)]
    intervals: Vec<IperfInterval>,
    #[serde(default)]
    end: IperfEnd,
}

/// A failed run has no `test_start`
#[derive(Debug, Default, Deserialize)]
struct IperfStart {
    #[serde(default)]
    test_start: Option<IperfTestStart>,
}

#[derive(Debug, Deserialize)]
struct IperfTestStart {
    protocol: String,
    num_streams: u32,
}

#[derive(Debug, Deserialize)]
struct IperfInterval {
    sum: IperfSum,
}

#[derive(Debug, Default, Deserialize)]
struct IperfEnd {
    #[serde(default)]
    sum: Option<IperfSum>,
}

#[derive(Debug, Default, Deserialize)]
struct IperfSum {
    #[serde(default)]
    bits_per_second: f64,
    #[serde(default)]
    lost_percent: Option<f64>,
}

/// Field-aware parser for `iperf3 -J`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOutputParser;

impl OutputParser for JsonOutputParser {
    fn parse(
        &self,
        mode: TrafficMode,
        raw: &str,
        window: TimeWindow,
    ) -> TrafficResult<TrafficTestResult> {
        let report: IperfReport = serde_json::from_str(raw)?;
        if let Some(error) = report.error {
            return Err(TrafficError::parse("iperf3 output", error));
        }
        let test_start = report
            .start
            .test_start
            .ok_or_else(|| TrafficError::parse("iperf3 output", "no start.test_start section"))?;

        let mut throughput: Vec<f64> = report
            .intervals
            .iter()
            .map(|interval| round2(interval.sum.bits_per_second / 1e6))
            .collect();
        if throughput.is_empty() {
            throughput.push(0.0);
        }

        let loss = match mode {
            TrafficMode::Udp => report
                .end
                .sum
                .and_then(|sum| sum.lost_percent)
                .map(|pct| format!("{}%", round2(pct))),
            _ => None,
        };

        Ok(TrafficTestResult {
            mode,
            protocol: test_start.protocol,
            streams: test_start.num_streams,
            window,
            throughput_mbps: throughput,
            loss,
            bandwidth_target: None,
        })
    }

    fn extra_args(&self) -> &'static [&'static str] {
        &["-J"]
    }
}

/// Read the `min/avg/max/mdev` summary of a ping run
pub fn parse_ping(raw: &str, window: TimeWindow, probe_count: u32) -> TrafficResult<LatencyResult> {
    let caps = PING_SUMMARY
        .captures(raw)
        .ok_or_else(|| TrafficError::parse("ping output", "no min/avg/max/mdev summary"))?;

    let field = |i: usize| -> TrafficResult<f64> {
        caps[i]
            .parse::<f64>()
            .map_err(|e| TrafficError::parse("ping summary", e.to_string()))
    };

    Ok(LatencyResult {
        window,
        probe_count,
        min_ms: field(1)?,
        avg_ms: field(2)?,
        max_ms: field(3)?,
        mdev_ms: field(4)?,
    })
}
