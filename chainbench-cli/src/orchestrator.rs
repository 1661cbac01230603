//! Phase sequencing
//!
//! The orchestrator decides what runs, in which order, over which window and
//! under which heading. Side effects (subprocesses, HTTP, the run log, the
//! console) sit behind [`PhaseExecutor`].

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chainbench_config::TrafficConfig;
use chainbench_core::{LatencyResult, TimeWindow, TrafficMode, TrafficTestResult};
use chrono::Utc;
use std::time::Duration;
use tracing::{info, warn};

/// Phases requested on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseSelection {
    pub wait: bool,
    pub baseline: bool,
    pub tcp: bool,
    pub stream: bool,
    pub udp: bool,
    pub latency: bool,
    pub all: bool,
}

impl PhaseSelection {
    pub fn is_empty(&self) -> bool {
        !(self.wait
            || self.baseline
            || self.tcp
            || self.stream
            || self.udp
            || self.latency
            || self.all)
    }
}

/// Durations the orchestrator sleeps or looks back over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTimings {
    pub cooldown: Duration,
    pub pre_run_wait: Duration,
    pub baseline_lookback: Duration,
}

impl From<&TrafficConfig> for PhaseTimings {
    fn from(config: &TrafficConfig) -> Self {
        Self {
            cooldown: config.cooldown,
            pre_run_wait: config.pre_run_wait,
            baseline_lookback: config.baseline_lookback,
        }
    }
}

/// Effects each phase needs
#[async_trait]
pub trait PhaseExecutor: Send + Sync {
    /// Operator-facing phase banner
    fn announce(&self, message: &str);

    async fn run_traffic(&self, mode: TrafficMode) -> Result<TrafficTestResult>;

    async fn run_latency(&self) -> Result<LatencyResult>;

    async fn report_traffic(&self, result: &TrafficTestResult) -> Result<()>;

    async fn report_latency(&self, result: &LatencyResult) -> Result<()>;

    /// Fetch host and instance metrics over `window` and write them under
    /// `<prefix>|<tag> ...` headings
    async fn snapshot(&self, prefix: &str, tag: &str, window: &TimeWindow) -> Result<()>;

    /// Sleep with a countdown; returns the window slept through
    async fn countdown(&self, duration: Duration) -> Result<TimeWindow>;

    /// Closing block covering the whole run
    async fn report_timestamp(&self, run: &TimeWindow) -> Result<()>;
}

/// States of the `all` sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllPhase {
    /// Latency probe, then an unsnapshotted cooldown
    Latency,
    TcpActive,
    TcpCooldown,
    StreamActive,
    StreamCooldown,
    UdpActive,
    Done,
}

impl AllPhase {
    pub fn next(self) -> Self {
        match self {
            AllPhase::Latency => AllPhase::TcpActive,
            AllPhase::TcpActive => AllPhase::TcpCooldown,
            AllPhase::TcpCooldown => AllPhase::StreamActive,
            AllPhase::StreamActive => AllPhase::StreamCooldown,
            AllPhase::StreamCooldown => AllPhase::UdpActive,
            AllPhase::UdpActive => AllPhase::Done,
            AllPhase::Done => AllPhase::Done,
        }
    }

    /// Heading prefix for blocks written in this state
    pub fn prefix(self) -> &'static str {
        match self {
            AllPhase::Latency => "ALL-TRAFFIC-LATENCY",
            AllPhase::TcpActive | AllPhase::TcpCooldown => "ALL-TRAFFIC-TCP",
            AllPhase::StreamActive | AllPhase::StreamCooldown => "ALL-TRAFFIC-TCP-STREAM",
            AllPhase::UdpActive | AllPhase::Done => "ALL-TRAFFIC-UDP",
        }
    }
}

/// Heading prefix for a traffic mode run on its own
pub fn standalone_prefix(mode: TrafficMode) -> &'static str {
    match mode {
        TrafficMode::Tcp => "TRAFFIC-TCP",
        TrafficMode::Stream => "TRAFFIC-STREAM",
        TrafficMode::Udp => "TRAFFIC-UDP",
    }
}

pub const BASELINE_PREFIX: &str = "BASELINE";
pub const LATENCY_PREFIX: &str = "TRAFFIC-LATENCY";

pub struct Orchestrator<E> {
    executor: E,
    timings: PhaseTimings,
}

impl<E: PhaseExecutor> Orchestrator<E> {
    pub fn new(executor: E, timings: PhaseTimings) -> Self {
        Self { executor, timings }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run every selected phase in fixed order, then the closing block.
    /// Returns the window the whole run covered.
    pub async fn run(&self, phases: PhaseSelection) -> Result<TimeWindow> {
        let started = Utc::now();
        if phases.is_empty() {
            warn!("No phase selected; only the timestamp block will be written");
        }

        if phases.wait {
            self.executor.announce("Waiting before the first phase");
            self.executor.countdown(self.timings.pre_run_wait).await?;
        }
        if phases.baseline {
            self.baseline().await?;
        }
        if phases.tcp {
            self.traffic(TrafficMode::Tcp, standalone_prefix(TrafficMode::Tcp))
                .await?;
        }
        if phases.stream {
            self.traffic(TrafficMode::Stream, standalone_prefix(TrafficMode::Stream))
                .await?;
        }
        if phases.udp {
            self.traffic(TrafficMode::Udp, standalone_prefix(TrafficMode::Udp))
                .await?;
        }
        if phases.latency {
            self.latency(LATENCY_PREFIX).await?;
        }
        if phases.all {
            self.all().await?;
        }

        let run = TimeWindow::since(started);
        self.executor.report_timestamp(&run).await?;
        info!("Run finished after {}s", run.duration().as_secs());
        Ok(run)
    }

    async fn baseline(&self) -> Result<()> {
        self.executor.announce("Fetching baseline values");
        let window = TimeWindow::trailing(Utc::now(), self.timings.baseline_lookback)
            .ok_or_else(|| {
                anyhow!(
                    "baseline lookback of {}s reaches outside the supported date range",
                    self.timings.baseline_lookback.as_secs()
                )
            })?;
        self.executor.snapshot(BASELINE_PREFIX, "", &window).await
    }

    /// Run one mode; its metrics snapshot lands before its report
    async fn traffic(&self, mode: TrafficMode, prefix: &str) -> Result<()> {
        info!("{} phase: {}", prefix, mode.heading());
        let result = self.executor.run_traffic(mode).await?;
        self.executor
            .snapshot(prefix, mode.label(), &result.window)
            .await?;
        self.executor.report_traffic(&result).await
    }

    async fn latency(&self, prefix: &str) -> Result<()> {
        info!("{} phase", prefix);
        let result = self.executor.run_latency().await?;
        self.executor.report_latency(&result).await
    }

    async fn all(&self) -> Result<()> {
        self.executor.announce("Starting all tests");

        let mut state = AllPhase::Latency;
        while state != AllPhase::Done {
            info!("all sequence: {:?}", state);
            match state {
                AllPhase::Latency => {
                    self.latency(state.prefix()).await?;
                    self.executor.countdown(self.timings.cooldown).await?;
                }
                AllPhase::TcpActive => self.traffic(TrafficMode::Tcp, state.prefix()).await?,
                AllPhase::TcpCooldown => {
                    let window = self.executor.countdown(self.timings.cooldown).await?;
                    self.executor
                        .snapshot(state.prefix(), "AFTER TCP", &window)
                        .await?;
                }
                AllPhase::StreamActive => {
                    self.traffic(TrafficMode::Stream, state.prefix()).await?
                }
                AllPhase::StreamCooldown => {
                    let window = self.executor.countdown(self.timings.cooldown).await?;
                    self.executor
                        .snapshot(state.prefix(), "AFTER TCP-STREAM", &window)
                        .await?;
                }
                AllPhase::UdpActive => self.traffic(TrafficMode::Udp, state.prefix()).await?,
                AllPhase::Done => {}
            }
            state = state.next();
        }
        Ok(())
    }
}
