//! # Chainbench Output
//!
//! Everything that leaves the process as text: `+---+` tables, the framed
//! blocks appended to the per-run log, the stdout echo of each block and
//! the console countdown.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chainbench_config::ReportConfig;
//! use chainbench_core::TimeWindow;
//! use chainbench_output::{ReportWriter, TextTable};
//! use chrono::Utc;
//!
//! # async fn example() -> Result<(), chainbench_output::DeliveryError> {
//! let writer = ReportWriter::from_config("nightly", &ReportConfig::default());
//!
//! let mut table = TextTable::new(["Parameter", "Max", "Min", "Average"]);
//! table.add_row(["cpu_utilization [%]", "12.5", "3.0", "7.25"]);
//!
//! let window = TimeWindow::since(Utc::now());
//! writer.write("BASELINE| Server Metric", &window, &table.to_string()).await?;
//! # Ok(())
//! # }
//! ```

pub mod console;
pub mod destination;
pub mod destinations;
pub mod errors;
pub mod render;
pub mod table;
pub mod writer;

pub use destination::OutputDestination;
pub use destinations::{FilesystemConfig, FilesystemDestination, StdioDestination};
pub use errors::DeliveryError;
pub use render::{
    host_metrics_table, infra_metrics_body, latency_table, timestamp_body, traffic_table,
    LATENCY_HEADING, NO_INSTANCES_MARKER, TIMESTAMP_HEADING, UNAVAILABLE_MARKER,
};
pub use table::{format_value, TextTable};
pub use writer::ReportWriter;
