//! Report bodies for each kind of block in the run log

use crate::table::{format_value, TextTable};
use chainbench_core::{
    LatencyResult, MetricReading, ReducedMetric, TimeWindow, TrafficMode, TrafficTestResult,
};
use chainbench_telemetry::InfraSnapshot;

/// Heading of the latency block
pub const LATENCY_HEADING: &str = "Traffic Latency Test";

/// Heading of the closing block with the whole run's window
pub const TIMESTAMP_HEADING: &str = "Timestamp";

/// Written in place of the instance tables when Nova lists no instances
pub const NO_INSTANCES_MARKER: &str = "Error";

/// Written in place of a number when a series had no points
pub const UNAVAILABLE_MARKER: &str = "unavailable";

const THROUGHPUT_PARAMETER: &str = "Throughput [Mbits/Sec]";

/// One-row table summarizing an iperf3 run
pub fn traffic_table(result: &TrafficTestResult) -> TextTable {
    let mut headers = vec!["Traffic Details", "Parameter", "Max", "Min", "Average"];
    if result.mode == TrafficMode::Udp {
        headers.push("Datagrams Loss %");
    }

    let summary = result.throughput();
    let mut row = vec![
        result.details(),
        THROUGHPUT_PARAMETER.to_string(),
        format_value(summary.max),
        format_value(summary.min),
        format_value(summary.average),
    ];
    if result.mode == TrafficMode::Udp {
        row.push(result.loss.clone().unwrap_or_default());
    }

    let mut table = TextTable::new(headers);
    table.add_row(row);
    table
}

pub fn latency_table(latency: &LatencyResult) -> TextTable {
    let summary = latency.summary();
    let mut table = TextTable::new(["Traffic Details", "Parameter", "Max", "Min", "Average"]);
    table.add_row([
        "Ping test".to_string(),
        "Latency [ms]".to_string(),
        format_value(summary.max),
        format_value(summary.min),
        format_value(summary.average),
    ]);
    table
}

/// Host metrics from Prometheus, one row per query
pub fn host_metrics_table(metrics: &[ReducedMetric]) -> TextTable {
    let mut table = TextTable::new(["Parameter", "Max", "Min", "Average"]);
    for metric in metrics {
        table.add_row(metric_row(metric));
    }
    table
}

/// Per-instance Gnocchi tables, or the failure marker when there were no instances
pub fn infra_metrics_body(snapshot: &InfraSnapshot) -> String {
    let instances = match snapshot {
        InfraSnapshot::Instances(instances) => instances,
        InfraSnapshot::NoInstances => return NO_INSTANCES_MARKER.to_string(),
    };

    let mut body = String::new();
    for instance in instances {
        body.push_str(&format!(
            "------------ INSTANCE : {} ------------\n",
            instance.instance
        ));
        let mut table = TextTable::new(["Metric", "Maximum", "Minimum", "Average"]);
        for metric in &instance.metrics {
            table.add_row(metric_row(metric));
        }
        body.push_str(&table.to_string());
        body.push('\n');
    }
    body
}

/// Epoch and local start/end of the whole run
pub fn timestamp_body(run: &TimeWindow) -> String {
    format!(
        "EPOC Start time:{} | End time:{} \nStart time:{} | End time:{}",
        run.start_epoch(),
        run.end_epoch(),
        run.start_local(),
        run.end_local()
    )
}

fn metric_row(metric: &ReducedMetric) -> Vec<String> {
    match metric.reading {
        MetricReading::Reduced(summary) => vec![
            metric.name.clone(),
            format_value(summary.max),
            format_value(summary.min),
            format_value(summary.average),
        ],
        MetricReading::Unavailable => vec![
            metric.name.clone(),
            UNAVAILABLE_MARKER.to_string(),
            UNAVAILABLE_MARKER.to_string(),
            UNAVAILABLE_MARKER.to_string(),
        ],
    }
}
