//! Upload format detection and size limits

use crate::error::ImportError;
use crate::types::FileFormat;

/// Default upload limit (5 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

const CSV_CONTENT_TYPES: &[&str] = &["text/csv"];
const SPREADSHEET_CONTENT_TYPES: &[&str] = &[
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];
/// Types that say nothing about the content; the suffix decides
const GENERIC_CONTENT_TYPES: &[&str] = &["", "application/octet-stream"];

/// Classify a file by declared content type, falling back to its name suffix
/// only when the declared type is missing or generic.
pub fn detect_format(file_name: &str, content_type: Option<&str>) -> Result<FileFormat, ImportError> {
    if let Some(declared) = content_type {
        let mime = essence(declared);
        if let Some(format) = format_from_mime(&mime) {
            return Ok(format);
        }
        if !GENERIC_CONTENT_TYPES.contains(&mime.as_str()) {
            return Err(ImportError::UnsupportedFormat);
        }
    }
    format_from_file_name(file_name).ok_or(ImportError::UnsupportedFormat)
}

pub fn check_size(size: u64, limit: u64) -> Result<(), ImportError> {
    if size > limit {
        return Err(ImportError::FileTooLarge { size, limit });
    }
    Ok(())
}

/// Format first, then size. Neither needs the file contents.
pub fn validate_upload(
    file_name: &str,
    content_type: Option<&str>,
    size: u64,
    limit: u64,
) -> Result<FileFormat, ImportError> {
    let format = detect_format(file_name, content_type)?;
    check_size(size, limit)?;
    Ok(format)
}

/// "text/csv; charset=utf-8" -> "text/csv"
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

fn format_from_mime(mime: &str) -> Option<FileFormat> {
    if CSV_CONTENT_TYPES.contains(&mime) {
        Some(FileFormat::Csv)
    } else if SPREADSHEET_CONTENT_TYPES.contains(&mime) {
        Some(FileFormat::Spreadsheet)
    } else {
        None
    }
}

fn format_from_file_name(file_name: &str) -> Option<FileFormat> {
    let name = file_name.trim().to_ascii_lowercase();
    if name.ends_with(".csv") {
        Some(FileFormat::Csv)
    } else if name.ends_with(".xls") || name.ends_with(".xlsx") {
        Some(FileFormat::Spreadsheet)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_csv_by_content_type() {
        assert_eq!(detect_format("upload", Some("text/csv")), Ok(FileFormat::Csv));
    }

    #[test]
    fn test_detect_content_type_ignores_parameters() {
        assert_eq!(
            detect_format("upload", Some("text/csv; charset=utf-8")),
            Ok(FileFormat::Csv)
        );
    }

    #[test]
    fn test_detect_spreadsheet_content_types() {
        assert_eq!(
            detect_format("upload", Some("application/vnd.ms-excel")),
            Ok(FileFormat::Spreadsheet)
        );
        assert_eq!(
            detect_format(
                "upload",
                Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
            ),
            Ok(FileFormat::Spreadsheet)
        );
    }

    #[test]
    fn test_detect_by_suffix_case_insensitive() {
        assert_eq!(detect_format("Candidates.CSV", None), Ok(FileFormat::Csv));
        assert_eq!(detect_format("batch.xls", None), Ok(FileFormat::Spreadsheet));
        assert_eq!(detect_format("batch.XLSX", Some("")), Ok(FileFormat::Spreadsheet));
    }

    #[test]
    fn test_generic_content_type_falls_back_to_suffix() {
        assert_eq!(
            detect_format("candidates.csv", Some("application/octet-stream")),
            Ok(FileFormat::Csv)
        );
    }

    #[test]
    fn test_pdf_is_unsupported() {
        assert_eq!(
            detect_format("resume.pdf", Some("application/pdf")),
            Err(ImportError::UnsupportedFormat)
        );
    }

    #[test]
    fn test_pdf_content_type_rejected_despite_csv_name() {
        assert_eq!(
            detect_format("candidates.csv", Some("application/pdf")),
            Err(ImportError::UnsupportedFormat)
        );
        assert_eq!(
            detect_format("batch.xlsx", Some("image/png")),
            Err(ImportError::UnsupportedFormat)
        );
    }

    #[test]
    fn test_empty_content_type_falls_back_to_suffix() {
        assert_eq!(detect_format("candidates.csv", Some("")), Ok(FileFormat::Csv));
        assert_eq!(detect_format("resume.pdf", Some("")), Err(ImportError::UnsupportedFormat));
    }

    #[test]
    fn test_no_hint_is_unsupported() {
        assert_eq!(detect_format("candidates", None), Err(ImportError::UnsupportedFormat));
        assert_eq!(detect_format("candidates.csv.bak", None), Err(ImportError::UnsupportedFormat));
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        assert!(check_size(DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_FILE_SIZE).is_ok());
        assert_eq!(
            check_size(DEFAULT_MAX_FILE_SIZE + 1, DEFAULT_MAX_FILE_SIZE),
            Err(ImportError::FileTooLarge {
                size: DEFAULT_MAX_FILE_SIZE + 1,
                limit: DEFAULT_MAX_FILE_SIZE,
            })
        );
    }

    #[test]
    fn test_validate_checks_format_before_size() {
        let result = validate_upload("resume.pdf", None, 100 * 1024 * 1024, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(result, Err(ImportError::UnsupportedFormat));
    }

    #[test]
    fn test_validate_six_mib_csv_is_too_large() {
        let result = validate_upload("big.csv", Some("text/csv"), 6 * 1024 * 1024, DEFAULT_MAX_FILE_SIZE);
        assert!(matches!(result, Err(ImportError::FileTooLarge { .. })));
    }
}
