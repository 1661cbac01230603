//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// A `CHAINBENCH_*` variable is set but unparsable
    #[error("Environment variable error: {0}")]
    EnvError(String),

    /// A domain section failed validation
    #[error("Domain configuration error in {domain}: {message}")]
    DomainError { domain: String, message: String },
}
