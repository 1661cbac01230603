//! Core type definitions for chainbench

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::stats;

/// Timestamp format used in report blocks (`dd-mm-YYYY HH:MM:SS`, local time)
pub const REPORT_TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// A closed time interval a test or snapshot covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window of length `lookback` ending at `end`.
    ///
    /// Returns `None` when the start would fall outside the representable
    /// date range.
    pub fn trailing(end: DateTime<Utc>, lookback: Duration) -> Option<Self> {
        let lookback = chrono::Duration::from_std(lookback).ok()?;
        let start = end.checked_sub_signed(lookback)?;
        Some(Self { start, end })
    }

    /// Window from `start` until now
    pub fn since(start: DateTime<Utc>) -> Self {
        Self::new(start, Utc::now())
    }

    /// Start as fractional epoch seconds
    pub fn start_epoch(&self) -> f64 {
        epoch_seconds(&self.start)
    }

    /// End as fractional epoch seconds
    pub fn end_epoch(&self) -> f64 {
        epoch_seconds(&self.end)
    }

    pub fn duration(&self) -> Duration {
        (self.end - self.start).to_std().unwrap_or_default()
    }

    /// Start rendered in local time with [`REPORT_TIME_FORMAT`]
    pub fn start_local(&self) -> String {
        self.start
            .with_timezone(&Local)
            .format(REPORT_TIME_FORMAT)
            .to_string()
    }

    /// End rendered in local time with [`REPORT_TIME_FORMAT`]
    pub fn end_local(&self) -> String {
        self.end
            .with_timezone(&Local)
            .format(REPORT_TIME_FORMAT)
            .to_string()
    }
}

fn epoch_seconds(at: &DateTime<Utc>) -> f64 {
    at.timestamp() as f64 + f64::from(at.timestamp_subsec_micros()) / 1_000_000.0
}

/// Rounded (max, min, average) of a sample sequence
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub max: f64,
    pub min: f64,
    pub average: f64,
}

/// Outcome of reducing one metric series.
///
/// `Unavailable` marks a series with no measurement points. It is distinct
/// from a numeric zero and renders as a literal marker in reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MetricReading {
    Reduced(Summary),
    Unavailable,
}

impl MetricReading {
    /// Reduce samples, yielding `Unavailable` for an empty series
    pub fn from_samples(samples: &[f64]) -> Self {
        match stats::reduce(samples) {
            Some(summary) => MetricReading::Reduced(summary),
            None => MetricReading::Unavailable,
        }
    }

    pub fn summary(&self) -> Option<&Summary> {
        match self {
            MetricReading::Reduced(summary) => Some(summary),
            MetricReading::Unavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, MetricReading::Unavailable)
    }
}

/// A named, reduced metric ready for a report row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducedMetric {
    pub name: String,
    pub reading: MetricReading,
}

impl ReducedMetric {
    pub fn new(name: impl Into<String>, reading: MetricReading) -> Self {
        Self {
            name: name.into(),
            reading,
        }
    }

    pub fn reduced(name: impl Into<String>, summary: Summary) -> Self {
        Self::new(name, MetricReading::Reduced(summary))
    }
}

/// Throughput test modes driven through iperf3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficMode {
    Tcp,
    Stream,
    Udp,
}

impl TrafficMode {
    /// Tag used for the post-test metrics snapshot
    pub fn label(&self) -> &'static str {
        match self {
            TrafficMode::Tcp => "TCP",
            TrafficMode::Stream => "TCP-Stream",
            TrafficMode::Udp => "UDP",
        }
    }

    /// Heading of the traffic report block
    pub fn heading(&self) -> &'static str {
        match self {
            TrafficMode::Tcp => "Iperf TCP testing",
            TrafficMode::Stream => "Iperf TCP-Stream testing",
            TrafficMode::Udp => "Iperf UDP testing",
        }
    }
}

impl fmt::Display for TrafficMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Structured outcome of one iperf3 run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficTestResult {
    pub mode: TrafficMode,
    pub protocol: String,
    pub streams: u32,
    pub window: TimeWindow,
    /// Per-interval throughput in Mbit/s, in report order
    pub throughput_mbps: Vec<f64>,
    /// Datagram loss, UDP only
    pub loss: Option<String>,
    /// Requested UDP bit rate, e.g. `1G`
    pub bandwidth_target: Option<String>,
}

impl TrafficTestResult {
    pub fn throughput(&self) -> Summary {
        stats::reduce(&self.throughput_mbps).unwrap_or_default()
    }

    /// Multi-line details cell: window, protocol and stream count
    pub fn details(&self) -> String {
        let mut details = format!(
            "Test start time: {}\nTest  end  time: {}\nProtocols: {}\nStreams: {}",
            self.window.start_local(),
            self.window.end_local(),
            self.protocol,
            self.streams
        );
        if let Some(ref bandwidth) = self.bandwidth_target {
            details.push_str(&format!("\n Bandwidth Set: {}", bandwidth));
        }
        details
    }
}

/// Round-trip latency summary from a ping run, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyResult {
    pub window: TimeWindow,
    pub probe_count: u32,
    pub min_ms: f64,
    pub avg_ms: f64,
    pub max_ms: f64,
    pub mdev_ms: f64,
}

impl LatencyResult {
    pub fn summary(&self) -> Summary {
        Summary {
            max: self.max_ms,
            min: self.min_ms,
            average: self.avg_ms,
        }
    }
}
