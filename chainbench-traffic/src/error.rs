use thiserror::Error;

pub type TrafficResult<T> = Result<T, TrafficError>;

#[derive(Error, Debug)]
pub enum TrafficError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Could not parse {what}: {reason}")]
    Parse { what: &'static str, reason: String },

    #[error("Invalid iperf3 JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrafficError {
    pub(crate) fn parse(what: &'static str, reason: impl Into<String>) -> Self {
        TrafficError::Parse {
            what,
            reason: reason.into(),
        }
    }
}
