//! Destination trait for rendered report blocks

use crate::errors::DeliveryError;
use async_trait::async_trait;

/// Somewhere a finished block of report text can be appended
#[async_trait]
pub trait OutputDestination: Send + Sync {
    /// Append `data` as-is; destinations add no framing of their own
    async fn deliver(&self, data: &str) -> Result<(), DeliveryError>;

    /// Destination type for logging
    fn destination_type(&self) -> &'static str;
}
