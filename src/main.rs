//! Candidate Import - bulk candidate ingestion from CSV and Excel files
//!
//! Parses an uploaded file, validates each row and hands the accepted
//! candidates to the bulk-create consumer.

mod cli;
mod config;
mod error;
mod services;
mod types;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::services::bulk_sink::JsonSink;
use crate::services::import_pipeline::{ImportFile, ImportPipeline};
use crate::services::template::{template_csv, TEMPLATE_FILE_NAME};
use crate::types::Notification;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::Config::from_env()?;

    std::fs::create_dir_all(&config.logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &config.logs_dir, "import.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - stderr (stdout may carry the JSON batch) and file
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,candidate_import=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    info!("Configuration loaded");

    match cli.command {
        Command::Import { file, content_type, output } => {
            let upload = ImportFile::from_path(&file, content_type)
                .await
                .with_context(|| format!("cannot open {}", file.display()))?;

            let pipeline = ImportPipeline::from_config(JsonSink::new(output), &config);

            match pipeline.run(upload).await {
                Ok(report) => {
                    for note in Notification::for_report(&report) {
                        eprintln!("{}", note.message());
                    }
                    eprint!("{}", report.summary(config.issue_display_limit));
                }
                Err(e) => {
                    let note = Notification::for_error(&e);
                    error!("Import failed: {}", e);
                    eprintln!("{}", note.message());
                    return Err(e.into());
                }
            }
        }
        Command::Template { output } => {
            let path = output.unwrap_or_else(|| TEMPLATE_FILE_NAME.into());
            let bytes = template_csv()?;
            tokio::fs::write(&path, bytes)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Template written to {}", path.display());
        }
    }

    Ok(())
}
