//! Phase effects against real tools, endpoints and the run log

use anyhow::{Context, Result};
use async_trait::async_trait;
use chainbench_core::{LatencyResult, TimeWindow, TrafficMode, TrafficTestResult};
use chainbench_output::{
    console, host_metrics_table, infra_metrics_body, latency_table, timestamp_body,
    traffic_table, ReportWriter, LATENCY_HEADING, TIMESTAMP_HEADING,
};
use chainbench_telemetry::Telemetry;
use chainbench_traffic::TrafficGenerator;
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info};

use crate::orchestrator::PhaseExecutor;

pub fn server_metric_heading(prefix: &str, tag: &str) -> String {
    format!("{}|{} Server Metric", prefix, tag)
}

pub fn gnocchi_metric_heading(prefix: &str, tag: &str) -> String {
    format!("{}|{} Gnocchi Metric", prefix, tag)
}

pub struct LiveExecutor {
    generator: TrafficGenerator,
    telemetry: Telemetry,
    writer: ReportWriter,
}

impl LiveExecutor {
    pub fn new(generator: TrafficGenerator, telemetry: Telemetry, writer: ReportWriter) -> Self {
        Self {
            generator,
            telemetry,
            writer,
        }
    }
}

#[async_trait]
impl PhaseExecutor for LiveExecutor {
    fn announce(&self, message: &str) {
        console::print_banner(message);
    }

    async fn run_traffic(&self, mode: TrafficMode) -> Result<TrafficTestResult> {
        console::print_banner(mode.heading());
        self.generator
            .run(mode)
            .await
            .with_context(|| format!("{} failed", mode.heading()))
    }

    async fn run_latency(&self) -> Result<LatencyResult> {
        console::print_banner(LATENCY_HEADING);
        self.generator
            .latency()
            .await
            .context("Latency test failed")
    }

    async fn report_traffic(&self, result: &TrafficTestResult) -> Result<()> {
        let table = traffic_table(result);
        self.writer
            .write(result.mode.heading(), &result.window, &table.to_string())
            .await?;
        Ok(())
    }

    async fn report_latency(&self, result: &LatencyResult) -> Result<()> {
        let table = latency_table(result);
        self.writer
            .write(LATENCY_HEADING, &result.window, &table.to_string())
            .await?;
        Ok(())
    }

    async fn snapshot(&self, prefix: &str, tag: &str, window: &TimeWindow) -> Result<()> {
        info!(
            "Collecting metrics for {}|{} over {}s",
            prefix,
            tag,
            window.duration().as_secs()
        );

        let host = self
            .telemetry
            .host_metrics(window)
            .await
            .context("Failed to fetch host metrics")?;
        self.writer
            .write(
                &server_metric_heading(prefix, tag),
                window,
                &host_metrics_table(&host).to_string(),
            )
            .await?;

        let infra = self
            .telemetry
            .infra_metrics(window)
            .await
            .context("Failed to fetch instance metrics")?;
        if let Some(snapshot) = infra {
            self.writer
                .write(
                    &gnocchi_metric_heading(prefix, tag),
                    window,
                    &infra_metrics_body(&snapshot),
                )
                .await?;
        }
        Ok(())
    }

    async fn countdown(&self, duration: Duration) -> Result<TimeWindow> {
        let started = Utc::now();
        debug!("Cooldown of {}s", duration.as_secs());

        for remaining in (1..=duration.as_secs()).rev() {
            console::print_countdown(remaining)?;
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        console::clear_countdown()?;

        Ok(TimeWindow::since(started))
    }

    async fn report_timestamp(&self, run: &TimeWindow) -> Result<()> {
        self.writer
            .write(TIMESTAMP_HEADING, run, &timestamp_body(run))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_headings() {
        assert_eq!(
            server_metric_heading("TRAFFIC-TCP", "TCP"),
            "TRAFFIC-TCP|TCP Server Metric"
        );
        assert_eq!(
            gnocchi_metric_heading("ALL-TRAFFIC-TCP", "AFTER TCP"),
            "ALL-TRAFFIC-TCP|AFTER TCP Gnocchi Metric"
        );
        assert_eq!(server_metric_heading("BASELINE", ""), "BASELINE| Server Metric");
    }
}
