//! Downloadable CSV template for candidate imports

use anyhow::Result;

use super::normalizer::{
    COL_COMPANY_NAME, COL_EMAIL, COL_FULL_NAME, COL_PASSWORD, COL_PHONE, COL_QUALIFICATIONS,
    COL_SPECIALIZATION,
};

pub const TEMPLATE_FILE_NAME: &str = "candidates_template.csv";

pub const TEMPLATE_HEADERS: [&str; 7] = [
    COL_FULL_NAME,
    COL_EMAIL,
    COL_PHONE,
    COL_PASSWORD,
    COL_COMPANY_NAME,
    COL_SPECIALIZATION,
    COL_QUALIFICATIONS,
];

pub const TEMPLATE_SAMPLE_ROW: [&str; 7] = [
    "John Doe",
    "john.doe@example.com",
    "+1234567890",
    "Password123",
    "Tech Corp",
    "Software Engineering",
    "BSc Computer Science, AWS Certified",
];

/// Header row plus one example candidate
pub fn template_csv() -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TEMPLATE_HEADERS)?;
    writer.write_record(TEMPLATE_SAMPLE_ROW)?;
    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}
