//! Import error taxonomy
//!
//! Every variant is terminal for the current import attempt. Per-row problems
//! (missing required fields) are never raised here; they are reported as
//! [`crate::types::RowIssue`]s on the import report.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ImportState;

/// Terminal failure of one import attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("unsupported file format (expected .csv, .xls or .xlsx)")]
    UnsupportedFormat,

    #[error("file is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("failed to parse file: {0}")]
    ParseError(String),

    #[error("file contains no data rows")]
    EmptyFile,

    #[error("no valid rows found ({skipped} row(s) skipped)")]
    NoValidRows { skipped: usize },

    #[error("failed to read file: {0}")]
    Io(String),

    #[error("another import is already in progress")]
    Busy,

    #[error("bulk create failed: {0}")]
    BulkCreate(String),

    #[error("invalid import state transition: {from:?} -> {to:?}")]
    InvalidTransition { from: ImportState, to: ImportState },
}

/// Stable, serializable key for an [`ImportError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    UnsupportedFormat,
    FileTooLarge,
    ParseError,
    EmptyFile,
    NoValidRows,
    Io,
    Busy,
    BulkCreate,
    InvalidTransition,
}

impl ImportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImportError::UnsupportedFormat => ErrorKind::UnsupportedFormat,
            ImportError::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            ImportError::ParseError(_) => ErrorKind::ParseError,
            ImportError::EmptyFile => ErrorKind::EmptyFile,
            ImportError::NoValidRows { .. } => ErrorKind::NoValidRows,
            ImportError::Io(_) => ErrorKind::Io,
            ImportError::Busy => ErrorKind::Busy,
            ImportError::BulkCreate(_) => ErrorKind::BulkCreate,
            ImportError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
        }
    }

    /// Message shown on the notification surface, one per error kind
    pub fn user_message(&self) -> String {
        match self {
            ImportError::UnsupportedFormat => {
                "Please upload a CSV or Excel file (.csv, .xls, .xlsx)".to_string()
            }
            ImportError::FileTooLarge { limit, .. } => {
                format!("File size must be at most {} MB", limit / (1024 * 1024))
            }
            ImportError::ParseError(msg) => format!("Error parsing file: {}", msg),
            ImportError::EmptyFile => "The file is empty or contains no data rows".to_string(),
            ImportError::NoValidRows { .. } => {
                "No valid candidates found. Full Name, Email and Password are required".to_string()
            }
            ImportError::Io(msg) => format!("Could not read the file: {}", msg),
            ImportError::Busy => "An import is already running, please wait".to_string(),
            ImportError::BulkCreate(msg) => format!("Failed to create candidates: {}", msg),
            ImportError::InvalidTransition { .. } => {
                "The import ended in an unexpected state".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn all_errors() -> Vec<ImportError> {
        vec![
            ImportError::UnsupportedFormat,
            ImportError::FileTooLarge { size: 6 * 1024 * 1024, limit: 5 * 1024 * 1024 },
            ImportError::ParseError("bad quote".to_string()),
            ImportError::EmptyFile,
            ImportError::NoValidRows { skipped: 3 },
            ImportError::Io("not found".to_string()),
            ImportError::Busy,
            ImportError::BulkCreate("timeout".to_string()),
            ImportError::InvalidTransition {
                from: ImportState::Completed,
                to: ImportState::Parsing,
            },
        ]
    }

    #[test]
    fn test_every_kind_has_distinct_user_message() {
        let messages: HashSet<String> = all_errors().iter().map(|e| e.user_message()).collect();
        assert_eq!(messages.len(), all_errors().len());
    }

    #[test]
    fn test_file_too_large_message_mentions_limit_in_mb() {
        let err = ImportError::FileTooLarge { size: 6 * 1024 * 1024, limit: 5 * 1024 * 1024 };
        assert!(err.user_message().contains("5 MB"));
        assert_eq!(err.kind(), ErrorKind::FileTooLarge);
    }

    #[test]
    fn test_parse_error_carries_parser_message() {
        let err = ImportError::ParseError("found record with 2 fields".to_string());
        assert!(err.to_string().contains("found record with 2 fields"));
        assert!(err.user_message().contains("found record with 2 fields"));
    }

    #[test]
    fn test_error_kind_serializes_to_camel_case() {
        let json = serde_json::to_string(&ErrorKind::NoValidRows).unwrap();
        assert_eq!(json, "\"noValidRows\"");
    }
}
