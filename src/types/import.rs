//! Import report and state types for bulk candidate import

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CandidateDraft;
use crate::error::{ErrorKind, ImportError};

// ==========================================================================
// Tests First (TDD)
// ==========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_draft() -> CandidateDraft {
        CandidateDraft {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: "secret".to_string(),
            phone: String::new(),
            company_name: String::new(),
            specialization: String::new(),
            qualifications: String::new(),
        }
    }

    fn report_with(accepted: usize, issues: usize) -> ImportReport {
        ImportReport {
            import_id: Uuid::nil(),
            file_name: "candidates.csv".to_string(),
            format: FileFormat::Csv,
            started_at: Utc::now(),
            duration_ms: 12,
            total_rows: accepted + issues,
            accepted: (0..accepted).map(|_| sample_draft()).collect(),
            skipped_count: issues,
            errors: (0..issues)
                .map(|i| RowIssue::missing(i + 2, vec!["Email"]))
                .collect(),
        }
    }

    // ImportState tests
    #[test]
    fn test_state_happy_path_transitions_are_legal() {
        let path = [
            ImportState::Idle,
            ImportState::Validating,
            ImportState::Parsing,
            ImportState::Normalizing,
            ImportState::Reporting,
            ImportState::Completed,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_state_any_running_state_can_fail() {
        for state in [
            ImportState::Validating,
            ImportState::Parsing,
            ImportState::Normalizing,
            ImportState::Reporting,
        ] {
            assert!(state.can_transition_to(ImportState::Failed));
            assert!(state.is_in_flight());
        }
    }

    #[test]
    fn test_state_terminal_states_have_no_exits() {
        for terminal in [ImportState::Completed, ImportState::Failed] {
            assert!(terminal.is_terminal());
            for next in [
                ImportState::Idle,
                ImportState::Validating,
                ImportState::Parsing,
                ImportState::Normalizing,
                ImportState::Reporting,
                ImportState::Completed,
                ImportState::Failed,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_state_cannot_skip_stages() {
        assert!(!ImportState::Idle.can_transition_to(ImportState::Parsing));
        assert!(!ImportState::Validating.can_transition_to(ImportState::Normalizing));
        assert!(!ImportState::Idle.can_transition_to(ImportState::Failed));
    }

    // ImportReport tests
    #[test]
    fn test_report_serializes_to_camel_case() {
        let json = serde_json::to_string(&report_with(1, 1)).unwrap();
        assert!(json.contains("skippedCount"));
        assert!(json.contains("rowNumber"));
        assert!(json.contains("importId"));
        assert!(json.contains("\"format\":\"csv\""));
    }

    #[test]
    fn test_report_summary_truncates_issue_list() {
        let report = report_with(1, 5);
        let summary = report.summary(2);
        assert!(summary.contains("Accepted: 1"));
        assert!(summary.contains("Skipped: 5"));
        assert!(summary.contains("Row 2:"));
        assert!(summary.contains("Row 3:"));
        assert!(!summary.contains("Row 4:"));
        assert!(summary.contains("... and 3 more"));
    }

    #[test]
    fn test_row_issue_lists_missing_fields() {
        let issue = RowIssue::missing(7, vec!["Full Name", "Password"]);
        assert_eq!(issue.row_number, 7);
        assert_eq!(issue.reason, "missing required field(s): Full Name, Password");
    }

    // Notification tests
    #[test]
    fn test_notifications_for_clean_report() {
        let notes = Notification::for_report(&report_with(3, 0));
        assert_eq!(notes, vec![Notification::Success { count: 3 }]);
        assert_eq!(notes[0].message(), "Successfully imported 3 candidate(s)");
    }

    #[test]
    fn test_notifications_include_skip_warning() {
        let notes = Notification::for_report(&report_with(2, 4));
        assert_eq!(notes.len(), 2);
        assert_eq!(
            notes[1].message(),
            "4 row(s) skipped due to missing required fields"
        );
    }

    #[test]
    fn test_notification_for_error_uses_kind() {
        let note = Notification::for_error(&ImportError::EmptyFile);
        match note {
            Notification::Failure { kind, .. } => assert_eq!(kind, ErrorKind::EmptyFile),
            other => panic!("unexpected notification {:?}", other),
        }
    }
}

// ==========================================================================
// Format
// ==========================================================================

/// Classification of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    /// xls or xlsx workbook
    Spreadsheet,
}

// ==========================================================================
// Report
// ==========================================================================

/// Why a single row was left out of the accepted batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowIssue {
    pub row_number: usize,
    pub missing_fields: Vec<String>,
    pub reason: String,
}

impl RowIssue {
    pub fn missing(row_number: usize, fields: Vec<&str>) -> Self {
        let reason = format!("missing required field(s): {}", fields.join(", "));
        Self {
            row_number,
            missing_fields: fields.into_iter().map(String::from).collect(),
            reason,
        }
    }
}

/// Summary of one import attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub import_id: Uuid,
    pub file_name: String,
    pub format: FileFormat,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Data rows seen by the normalizer
    pub total_rows: usize,
    /// In source row order
    pub accepted: Vec<CandidateDraft>,
    pub skipped_count: usize,
    pub errors: Vec<RowIssue>,
}

impl ImportReport {
    /// Skipped rows are a warning, never a failure
    pub fn has_warnings(&self) -> bool {
        self.skipped_count > 0
    }

    /// Plain-text summary listing at most `limit` row issues
    pub fn summary(&self, limit: usize) -> String {
        let mut report = format!("Candidate import from '{}'\n", self.file_name);
        report.push_str(&format!("Total rows: {}\n", self.total_rows));
        report.push_str(&format!("Accepted: {}\n", self.accepted.len()));
        report.push_str(&format!("Skipped: {}\n", self.skipped_count));

        if !self.errors.is_empty() {
            report.push_str("\nSkipped rows:\n");
            for issue in self.errors.iter().take(limit) {
                report.push_str(&format!("Row {}: {}\n", issue.row_number, issue.reason));
            }
            if self.errors.len() > limit {
                report.push_str(&format!("... and {} more\n", self.errors.len() - limit));
            }
        }

        report
    }
}

// ==========================================================================
// State machine
// ==========================================================================

/// Lifecycle of one import attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportState {
    Idle,
    Validating,
    Parsing,
    Normalizing,
    Reporting,
    Completed,
    Failed,
}

impl ImportState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ImportState::Completed | ImportState::Failed)
    }

    /// Between `Validating` and `Reporting` inclusive
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            ImportState::Validating
                | ImportState::Parsing
                | ImportState::Normalizing
                | ImportState::Reporting
        )
    }

    pub fn can_transition_to(self, next: ImportState) -> bool {
        use ImportState::*;
        match (self, next) {
            (Idle, Validating)
            | (Validating, Parsing)
            | (Parsing, Normalizing)
            | (Normalizing, Reporting)
            | (Reporting, Completed) => true,
            (from, Failed) => from.is_in_flight(),
            _ => false,
        }
    }
}

// ==========================================================================
// Notifications
// ==========================================================================

/// Message for the user-facing notification surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Notification {
    #[serde(rename_all = "camelCase")]
    Success { count: usize },
    #[serde(rename_all = "camelCase")]
    SkippedRows { count: usize },
    #[serde(rename_all = "camelCase")]
    Failure { kind: ErrorKind, message: String },
}

impl Notification {
    pub fn for_report(report: &ImportReport) -> Vec<Notification> {
        let mut notes = vec![Notification::Success {
            count: report.accepted.len(),
        }];
        if report.has_warnings() {
            notes.push(Notification::SkippedRows {
                count: report.skipped_count,
            });
        }
        notes
    }

    pub fn for_error(err: &ImportError) -> Notification {
        Notification::Failure {
            kind: err.kind(),
            message: err.user_message(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notification::Success { count } => {
                format!("Successfully imported {} candidate(s)", count)
            }
            Notification::SkippedRows { count } => {
                format!("{} row(s) skipped due to missing required fields", count)
            }
            Notification::Failure { message, .. } => message.clone(),
        }
    }
}
