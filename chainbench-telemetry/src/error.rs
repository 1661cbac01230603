use chainbench_http::HttpError;
use thiserror::Error;

pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Failures while fetching metrics
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] HttpError),

    #[error("{service} returned HTTP {status} for {url}")]
    Status {
        service: &'static str,
        status: u16,
        url: String,
    },

    #[error("Malformed {service} response: {reason}")]
    MalformedResponse {
        service: &'static str,
        reason: String,
    },

    #[error("Prometheus returned no series for query: {query}")]
    EmptyResult { query: String },

    #[error("No samples for metric '{metric}'")]
    EmptySeries { metric: String },

    #[error("Keystone response carried no X-Subject-Token header")]
    MissingToken,

    #[error("No public '{service_type}' endpoint in the service catalog")]
    MissingEndpoint { service_type: String },
}

impl TelemetryError {
    pub(crate) fn malformed(service: &'static str, reason: impl Into<String>) -> Self {
        TelemetryError::MalformedResponse {
            service,
            reason: reason.into(),
        }
    }
}
