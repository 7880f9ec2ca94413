//! Import services

pub mod bulk_sink;
pub mod format;
pub mod import_pipeline;
pub mod normalizer;
pub mod row_parser;
pub mod template;
