//! Row normalization and validation
//!
//! Maps each [`RawRow`] to either a [`CandidateDraft`] or a [`RowIssue`].
//! Every row is processed; a bad row never stops the batch.

use crate::types::{CandidateDraft, RawRow, RowIssue};

pub const COL_FULL_NAME: &str = "Full Name";
pub const COL_FIRST_NAME: &str = "First Name";
pub const COL_MIDDLE_NAME: &str = "Middle Name";
pub const COL_LAST_NAME: &str = "Last Name";
pub const COL_EMAIL: &str = "Email";
pub const COL_PASSWORD: &str = "Password";
pub const COL_PHONE: &str = "Phone";
pub const COL_COMPANY_NAME: &str = "Company Name";
pub const COL_COMPANY: &str = "Company";
pub const COL_SPECIALIZATION: &str = "Specialization";
pub const COL_QUALIFICATIONS: &str = "Qualifications";

/// Output of [`normalize_rows`]
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub accepted: Vec<CandidateDraft>,
    pub skipped: Vec<RowIssue>,
}

impl NormalizedBatch {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// `"Full Name"` if present, else First/Middle/Last joined by single spaces.
pub fn resolve_full_name(row: &RawRow) -> String {
    let full_name = row.get(COL_FULL_NAME);
    if !full_name.is_empty() {
        return full_name.to_string();
    }

    [COL_FIRST_NAME, COL_MIDDLE_NAME, COL_LAST_NAME]
        .iter()
        .map(|col| row.get(col))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize one row, or name the required fields it is missing.
pub fn normalize_row(row: &RawRow) -> Result<CandidateDraft, RowIssue> {
    let full_name = resolve_full_name(row);
    let email = row.get(COL_EMAIL).to_lowercase();
    let password = row.get(COL_PASSWORD).to_string();

    let mut missing = Vec::new();
    if full_name.is_empty() {
        missing.push(COL_FULL_NAME);
    }
    if email.is_empty() {
        missing.push(COL_EMAIL);
    }
    if password.is_empty() {
        missing.push(COL_PASSWORD);
    }
    if !missing.is_empty() {
        return Err(RowIssue::missing(row.row_number, missing));
    }

    let company_name = match row.get(COL_COMPANY_NAME) {
        "" => row.get(COL_COMPANY),
        name => name,
    };

    Ok(CandidateDraft {
        full_name,
        email,
        password,
        phone: row.get(COL_PHONE).to_string(),
        company_name: company_name.to_string(),
        specialization: row.get(COL_SPECIALIZATION).to_string(),
        qualifications: row.get(COL_QUALIFICATIONS).to_string(),
    })
}

/// Normalize all rows, preserving source order.
pub fn normalize_rows(rows: &[RawRow]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    for row in rows {
        match normalize_row(row) {
            Ok(draft) => batch.accepted.push(draft),
            Err(issue) => batch.skipped.push(issue),
        }
    }
    batch
}
