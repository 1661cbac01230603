use crate::error::{TrafficError, TrafficResult};
use crate::parse::{parse_ping, JsonOutputParser, OutputParser, TextOutputParser};
use crate::runner::{CommandRunner, CommandSpec};
use chainbench_config::{IperfOutputFormat, TargetConfig, TrafficConfig};
use chainbench_core::{LatencyResult, TimeWindow, TrafficMode, TrafficTestResult};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives ping and iperf3 against the configured target
pub struct TrafficGenerator {
    runner: Arc<dyn CommandRunner>,
    parser: Box<dyn OutputParser>,
    target: TargetConfig,
    traffic: TrafficConfig,
}

impl TrafficGenerator {
    pub fn new(runner: Arc<dyn CommandRunner>, target: TargetConfig, traffic: TrafficConfig) -> Self {
        let parser: Box<dyn OutputParser> = match target.output_format {
            IperfOutputFormat::Text => Box::new(TextOutputParser),
            IperfOutputFormat::Json => Box::new(JsonOutputParser),
        };
        Self::with_parser(runner, parser, target, traffic)
    }

    pub fn with_parser(
        runner: Arc<dyn CommandRunner>,
        parser: Box<dyn OutputParser>,
        target: TargetConfig,
        traffic: TrafficConfig,
    ) -> Self {
        Self {
            runner,
            parser,
            target,
            traffic,
        }
    }

    /// `iperf3 -c <host> -t <secs> [mode flags] -f m -V [parser flags]`
    pub fn iperf_command(&self, mode: TrafficMode) -> CommandSpec {
        let mut spec = CommandSpec::new(&self.target.iperf_binary)
            .arg("-c")
            .arg(&self.target.host)
            .arg("-t")
            .arg(self.traffic.test_duration.as_secs());

        spec = match mode {
            TrafficMode::Tcp => spec,
            TrafficMode::Stream => spec.arg("-P").arg(self.traffic.stream_count),
            TrafficMode::Udp => spec.arg("-u").arg("-b").arg(&self.traffic.udp_bandwidth),
        };

        spec = spec.arg("-f").arg("m").arg("-V");
        for extra in self.parser.extra_args() {
            spec = spec.arg(extra);
        }
        spec
    }

    /// `ping -c <count> <host>`
    pub fn ping_command(&self) -> CommandSpec {
        CommandSpec::new(&self.target.ping_binary)
            .arg("-c")
            .arg(self.traffic.ping_count)
            .arg(&self.target.host)
    }

    /// Run one throughput test and parse its output.
    ///
    /// A non-zero iperf3 exit is logged and the output is still parsed.
    pub async fn run(&self, mode: TrafficMode) -> TrafficResult<TrafficTestResult> {
        let spec = self.iperf_command(mode);
        info!("{}: {}", mode.heading(), spec);

        let start = Utc::now();
        let output = self.runner.run(&spec).await?;
        let window = TimeWindow::new(start, Utc::now());

        if !output.success {
            warn!(
                "{} exited with {}: {}",
                spec.program,
                output.status_text(),
                output.stderr.trim()
            );
        }

        let mut result = self.parser.parse(mode, &output.stdout, window)?;
        if mode == TrafficMode::Udp {
            result.bandwidth_target = Some(self.traffic.udp_bandwidth.clone());
        }

        debug!(
            "{} parsed: {} samples, protocol {}, {} streams",
            mode,
            result.throughput_mbps.len(),
            result.protocol,
            result.streams
        );
        Ok(result)
    }

    /// Run the ping probe; a non-zero exit is an error
    pub async fn latency(&self) -> TrafficResult<LatencyResult> {
        let spec = self.ping_command();
        info!("Traffic Latency Test: {}", spec);

        let start = Utc::now();
        let output = self.runner.run(&spec).await?;
        let window = TimeWindow::new(start, Utc::now());

        if !output.success {
            return Err(TrafficError::CommandFailed {
                program: spec.program,
                status: output.status_text(),
                stderr: output.stderr.trim().to_string(),
            });
        }

        parse_ping(&output.stdout, window, self.traffic.ping_count)
    }
}
