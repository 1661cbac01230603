//! Core domain models and types for chainbench
//!
//! This crate contains the fundamental types shared by the fetchers, the
//! traffic generators and the report writer. It has minimal dependencies and
//! defines the domain language of the application.

pub mod stats;
pub mod types;

// Re-export commonly used types at the crate root
pub use stats::{reduce, round2};
pub use types::{
    LatencyResult, MetricReading, ReducedMetric, Summary, TimeWindow, TrafficMode,
    TrafficTestResult, REPORT_TIME_FORMAT,
};
