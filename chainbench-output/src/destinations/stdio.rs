//! Standard output echo of report bodies

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::{destination::OutputDestination, errors::DeliveryError};

const STREAM: &str = "stdout";

/// Writes each delivered block to stdout followed by a newline
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioDestination;

impl StdioDestination {
    async fn write_to<W>(&self, out: W, data: &[u8]) -> Result<(), DeliveryError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut writer = BufWriter::new(out);
        writer
            .write_all(data)
            .await
            .map_err(|e| DeliveryError::stdio(STREAM, e))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| DeliveryError::stdio(STREAM, e))?;
        writer
            .flush()
            .await
            .map_err(|e| DeliveryError::stdio(STREAM, e))
    }
}

#[async_trait]
impl OutputDestination for StdioDestination {
    async fn deliver(&self, data: &str) -> Result<(), DeliveryError> {
        self.write_to(tokio::io::stdout(), data.as_bytes()).await
    }

    fn destination_type(&self) -> &'static str {
        STREAM
    }
}
