//! Run log configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the per-run log file is written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory holding run logs
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Suffix appended to the test name
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Mirror each report body to stdout
    #[serde(default = "crate::domains::utils::default_true")]
    pub echo_stdout: bool,
}

impl ReportConfig {
    /// Path of the run log for `test_name`
    pub fn log_path(&self, test_name: &str) -> PathBuf {
        self.directory.join(format!("{}{}", test_name, self.suffix))
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            suffix: default_suffix(),
            echo_stdout: true,
        }
    }
}

impl Validatable for ReportConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.suffix, "suffix", self.domain_name())?;
        if self.suffix.contains(std::path::MAIN_SEPARATOR) {
            return Err(self.validation_error("suffix cannot contain a path separator"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "report"
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_suffix() -> String {
    ".output".to_string()
}
