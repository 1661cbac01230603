use anyhow::{Context, Result};
use chainbench::{log_config_warnings, Cli, LiveExecutor, Orchestrator, PhaseTimings};
use chainbench_config::ChainbenchConfig;
use chainbench_http::{HttpClient, HttpManager};
use chainbench_logging::{init_logging_from_config, init_simple_tracing, LoggingGuard};
use chainbench_output::ReportWriter;
use chainbench_telemetry::Telemetry;
use chainbench_traffic::{TokioCommandRunner, TrafficGenerator};
use clap::Parser;
use colored::*;
use std::sync::Arc;
use tracing::{debug, info};

/// Initialize logging from configuration with fallback to simple tracing
fn init_logging(config: &ChainbenchConfig, log_level: Option<&str>) -> Result<LoggingGuard> {
    match init_logging_from_config(&config.logging, log_level) {
        Ok(guard) => {
            debug!("Structured logging initialized");
            Ok(guard)
        }
        Err(e) => {
            eprintln!(
                "Failed to initialize structured logging: {}, falling back to simple tracing",
                e
            );
            init_simple_tracing(log_level.unwrap_or(config.logging.level.as_str()))?;
            Ok(LoggingGuard::default())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;
    let _guard = init_logging(&config, cli.log_level.as_deref())?;
    log_config_warnings(&config);

    info!("chainbench starting run '{}' against {}", cli.name, config.target.host);

    let http = HttpManager::with_config(config.http.clone().into())
        .context("Failed to build HTTP client")?;
    let http: Arc<dyn HttpClient> = Arc::new(http);

    let executor = LiveExecutor::new(
        TrafficGenerator::new(
            Arc::new(TokioCommandRunner),
            config.target.clone(),
            config.traffic.clone(),
        ),
        Telemetry::from_config(http, &config.telemetry),
        ReportWriter::from_config(&cli.name, &config.report),
    );

    let orchestrator = Orchestrator::new(executor, PhaseTimings::from(&config.traffic));
    orchestrator.run(cli.phases()).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "✗".bright_red().bold(), e);
        std::process::exit(1);
    }
}
