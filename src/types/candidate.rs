//! Candidate row types

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One parsed file row, keyed by (trimmed) column header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based row number in the source file (header = 1)
    pub row_number: usize,
    pub cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            cells: HashMap::new(),
        }
    }

    /// Insert a cell, keeping the first value for duplicate headers
    pub fn insert(&mut self, header: &str, value: &str) {
        self.cells
            .entry(header.trim().to_string())
            .or_insert_with(|| value.trim().to_string());
    }

    /// Trimmed cell value, `""` when the column is absent
    pub fn get(&self, header: &str) -> &str {
        self.cells.get(header).map(|v| v.trim()).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }
}

impl<const N: usize> From<(usize, [(&str, &str); N])> for RawRow {
    fn from((row_number, cells): (usize, [(&str, &str); N])) -> Self {
        let mut row = RawRow::new(row_number);
        for (header, value) in cells {
            row.insert(header, value);
        }
        row
    }
}

/// Normalized candidate, ready for bulk creation
///
/// `full_name`, `email` and `password` are never empty; optional fields are
/// `""` rather than absent.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDraft {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub company_name: String,
    pub specialization: String,
    pub qualifications: String,
}

impl fmt::Debug for CandidateDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateDraft")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("phone", &self.phone)
            .field("company_name", &self.company_name)
            .field("specialization", &self.specialization)
            .field("qualifications", &self.qualifications)
            .finish()
    }
}
