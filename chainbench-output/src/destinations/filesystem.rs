//! Append-only run log on the local filesystem

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::{destination::OutputDestination, errors::DeliveryError};

/// Configuration for the filesystem destination
#[derive(Debug, Clone)]
pub struct FilesystemConfig {
    pub path: PathBuf,
    pub create_dirs: bool,
}

impl FilesystemConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            create_dirs: true,
        }
    }
}

/// Appends every delivered block to one file, creating it on first write
#[derive(Debug, Clone)]
pub struct FilesystemDestination {
    config: FilesystemConfig,
}

impl FilesystemDestination {
    pub fn new(config: FilesystemConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    fn display_path(&self) -> String {
        self.config.path.to_string_lossy().to_string()
    }

    async fn ensure_parent(&self) -> Result<(), DeliveryError> {
        if !self.config.create_dirs {
            return Ok(());
        }
        match self.config.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .await
                .map_err(|e| {
                    DeliveryError::filesystem(parent.to_string_lossy(), "create_dirs", e)
                }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl OutputDestination for FilesystemDestination {
    async fn deliver(&self, data: &str) -> Result<(), DeliveryError> {
        self.ensure_parent().await?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.path)
            .await
            .map_err(|e| DeliveryError::filesystem(self.display_path(), "open", e))?;

        file.write_all(data.as_bytes())
            .await
            .map_err(|e| DeliveryError::filesystem(self.display_path(), "write", e))?;
        file.flush()
            .await
            .map_err(|e| DeliveryError::filesystem(self.display_path(), "flush", e))?;

        debug!("Appended {} bytes to {}", data.len(), self.display_path());
        Ok(())
    }

    fn destination_type(&self) -> &'static str {
        "filesystem"
    }
}
