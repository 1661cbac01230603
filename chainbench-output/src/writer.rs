//! Timestamped report blocks appended to the run log

use chainbench_config::ReportConfig;
use chainbench_core::TimeWindow;
use chrono::Local;
use std::path::Path;
use tracing::{debug, info};

use crate::destination::OutputDestination;
use crate::destinations::{FilesystemConfig, FilesystemDestination, StdioDestination};
use crate::errors::DeliveryError;

/// Length of the asterisk rule closing every block
pub const BLOCK_RULE_WIDTH: usize = 50;

const CURRENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Appends framed blocks to `<directory>/<test name><suffix>` and echoes
/// each body to stdout
pub struct ReportWriter {
    test_name: String,
    log: FilesystemDestination,
    echo: Option<Box<dyn OutputDestination>>,
}

impl ReportWriter {
    pub fn new(test_name: impl Into<String>, log: FilesystemDestination) -> Self {
        Self {
            test_name: test_name.into(),
            log,
            echo: Some(Box::new(StdioDestination)),
        }
    }

    pub fn from_config(test_name: &str, config: &ReportConfig) -> Self {
        let path = config.log_path(test_name);
        info!("Run log: {}", path.display());

        let writer = Self::new(test_name, FilesystemDestination::new(FilesystemConfig::new(path)));
        if config.echo_stdout {
            writer
        } else {
            writer.without_echo()
        }
    }

    pub fn without_echo(mut self) -> Self {
        self.echo = None;
        self
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    pub fn log_path(&self) -> &Path {
        self.log.path()
    }

    /// Frame `body` with the current time, test name, heading and window
    pub fn render_block(&self, heading: &str, window: &TimeWindow, body: &str) -> String {
        format!(
            "\nCurrent time: {}\nTest name: {} | Heading: {}\nStart time:{} | End time:{}\nResults: \n{}\n{}",
            Local::now().format(CURRENT_TIME_FORMAT),
            self.test_name,
            heading,
            window.start_local(),
            window.end_local(),
            body,
            "*".repeat(BLOCK_RULE_WIDTH)
        )
    }

    /// Append one block to the run log, then echo the bare body
    pub async fn write(
        &self,
        heading: &str,
        window: &TimeWindow,
        body: &str,
    ) -> Result<(), DeliveryError> {
        let block = self.render_block(heading, window, body);
        self.log.deliver(&block).await?;
        debug!(
            "Wrote block '{}' to {} {}",
            heading,
            self.log.destination_type(),
            self.log.path().display()
        );

        if let Some(ref echo) = self.echo {
            echo.deliver(&format!("{}\n", body)).await?;
            debug!("Echoed block '{}' to {}", heading, echo.destination_type());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn window() -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 1, 0).unwrap(),
        )
    }

    #[test]
    fn test_block_layout() {
        let writer = ReportWriter::new(
            "demo",
            FilesystemDestination::new(FilesystemConfig::new("demo.output")),
        );
        let block = writer.render_block("Iperf TCP testing", &window(), "table");
        let lines: Vec<&str> = block.split('\n').collect();

        assert_eq!(lines[0], "");
        assert!(lines[1].starts_with("Current time: "));
        assert_eq!(lines[2], "Test name: demo | Heading: Iperf TCP testing");
        assert_eq!(
            lines[3],
            format!(
                "Start time:{} | End time:{}",
                window().start_local(),
                window().end_local()
            )
        );
        assert_eq!(lines[4], "Results: ");
        assert_eq!(lines[5], "table");
        assert_eq!(lines[6], "*".repeat(50));
        assert_eq!(lines.len(), 7);
    }

    #[tokio::test]
    async fn test_from_config_targets_suffixed_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = ReportConfig {
            directory: temp_dir.path().to_path_buf(),
            suffix: ".output".to_string(),
            echo_stdout: false,
        };
        let writer = ReportWriter::from_config("run1", &config);
        assert_eq!(writer.log_path(), temp_dir.path().join("run1.output"));

        writer.write("Timestamp", &window(), "x").await.unwrap();
        writer.write("Timestamp", &window(), "y").await.unwrap();

        let content = std::fs::read_to_string(writer.log_path()).unwrap();
        assert_eq!(content.matches("Heading: Timestamp").count(), 2);
        assert!(content.ends_with(&"*".repeat(50)));
    }
}
