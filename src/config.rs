//! Configuration management

use anyhow::{self, Context, Result};

use crate::services::format::DEFAULT_MAX_FILE_SIZE;

/// Row issues listed in the printed summary unless overridden
pub const DEFAULT_ISSUE_DISPLAY_LIMIT: usize = 20;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Upload size limit in bytes
    pub max_file_size: u64,

    /// How many skipped rows the text summary lists
    pub issue_display_limit: usize,

    /// Directory for rolling log files
    pub logs_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            issue_display_limit: DEFAULT_ISSUE_DISPLAY_LIMIT,
            logs_dir: "logs".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let max_file_size = match std::env::var("IMPORT_MAX_FILE_BYTES") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .with_context(|| format!("IMPORT_MAX_FILE_BYTES must be a byte count, got '{}'", value))?,
            Err(_) => defaults.max_file_size,
        };

        if max_file_size == 0 {
            anyhow::bail!("IMPORT_MAX_FILE_BYTES must be greater than zero");
        }

        let issue_display_limit = match std::env::var("IMPORT_ISSUE_DISPLAY_LIMIT") {
            Ok(value) => value
                .trim()
                .parse::<usize>()
                .with_context(|| format!("IMPORT_ISSUE_DISPLAY_LIMIT must be a number, got '{}'", value))?,
            Err(_) => defaults.issue_display_limit,
        };

        let logs_dir = std::env::var("LOGS_DIR").unwrap_or(defaults.logs_dir);

        Ok(Self {
            max_file_size,
            issue_display_limit,
            logs_dir,
        })
    }
}
