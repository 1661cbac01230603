use anyhow::{Context, Result};
use chainbench_config::domains::logging::{LogFormat, LogTarget, LoggingConfig, Rotation};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps background log writers alive; drop it last in `main`
#[must_use = "dropping the guard stops file logging"]
#[derive(Default)]
pub struct LoggingGuard {
    _guards: Vec<WorkerGuard>,
}

/// Pick the filter directive for a sink.
///
/// Precedence: CLI flag, then `RUST_LOG`, then the sink's own level, then the
/// configured default.
pub fn resolve_directive(
    cli_level: Option<&str>,
    rust_log: Option<&str>,
    sink_level: Option<&str>,
    config_level: &str,
) -> String {
    cli_level
        .or(rust_log)
        .or(sink_level)
        .unwrap_or(config_level)
        .to_string()
}

/// Initialize logging from configuration
pub fn init_logging_from_config(
    config: &LoggingConfig,
    cli_level: Option<&str>,
) -> Result<LoggingGuard> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let mut guard = LoggingGuard::default();
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(config.targets.len());

    for target in &config.targets {
        match target {
            LogTarget::Console { level } => {
                let directive = resolve_directive(
                    cli_level,
                    rust_log.as_deref(),
                    level.as_ref().map(|l| l.as_str()),
                    config.level.as_str(),
                );
                layers.push(fmt_layer(
                    std::io::stderr,
                    config.format,
                    true,
                    config.include_location,
                    env_filter(&directive),
                ));
            }
            LogTarget::File {
                directory,
                prefix,
                level,
                rotation,
            } => {
                let directory = Path::new(directory);
                std::fs::create_dir_all(directory).with_context(|| {
                    format!("Failed to create log directory {}", directory.display())
                })?;

                let appender = match rotation {
                    Rotation::Hourly => tracing_appender::rolling::hourly(directory, prefix),
                    Rotation::Daily => tracing_appender::rolling::daily(directory, prefix),
                    Rotation::Never => tracing_appender::rolling::never(directory, prefix),
                };
                let (writer, worker) = tracing_appender::non_blocking(appender);
                guard._guards.push(worker);

                let directive = resolve_directive(
                    cli_level,
                    rust_log.as_deref(),
                    level.as_ref().map(|l| l.as_str()),
                    config.level.as_str(),
                );
                layers.push(fmt_layer(
                    writer,
                    config.format,
                    false,
                    config.include_location,
                    env_filter(&directive),
                ));
            }
        }
    }

    // Use try_init to avoid panic if global subscriber already set
    if tracing_subscriber::registry().with(layers).try_init().is_err() {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(guard)
}

/// Initialize simple tracing for basic console output
pub fn init_simple_tracing(log_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(log_level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn fmt_layer<W>(
    writer: W,
    format: LogFormat,
    ansi: bool,
    include_location: bool,
    filter: EnvFilter,
) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .with_file(include_location)
        .with_line_number(include_location);

    match format {
        LogFormat::Json => base.json().with_filter(filter).boxed(),
        LogFormat::Compact => base.compact().with_filter(filter).boxed(),
        LogFormat::Pretty => base.pretty().with_filter(filter).boxed(),
        LogFormat::Text => base.with_filter(filter).boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_level_wins() {
        assert_eq!(
            resolve_directive(Some("trace"), Some("warn"), Some("error"), "info"),
            "trace"
        );
    }

    #[test]
    fn test_rust_log_beats_config() {
        assert_eq!(
            resolve_directive(None, Some("chainbench=debug"), Some("error"), "info"),
            "chainbench=debug"
        );
        assert_eq!(resolve_directive(None, None, Some("error"), "info"), "error");
        assert_eq!(resolve_directive(None, None, None, "warn"), "warn");
    }

    #[test]
    fn test_simple_tracing_twice_does_not_panic() {
        init_simple_tracing("debug").unwrap();
        init_simple_tracing("not==a filter").unwrap();
    }
}
