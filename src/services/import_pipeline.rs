//! Candidate import orchestrator
//!
//! Drives one uploaded file through
//! `Idle -> Validating -> Parsing -> Normalizing -> Reporting -> Completed`,
//! dropping to `Failed` on the first terminal error. Only one import runs per
//! pipeline at a time; a concurrent request is rejected with
//! [`ImportError::Busy`].
//!
//! Nothing irreversible happens before the hand-off to [`BulkCreate`], so a
//! caller may drop the returned future at any point. The in-flight slot is
//! released by [`ImportAttempt`]'s `Drop`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::ImportError;
use crate::services::format::{check_size, validate_upload};
use crate::services::normalizer::normalize_rows;
use crate::services::row_parser::RowParser;
use crate::types::{CandidateDraft, ImportReport, ImportState};

/// Downstream consumer of the accepted batch
#[async_trait]
pub trait BulkCreate: Send + Sync {
    async fn create_candidates(&self, candidates: &[CandidateDraft]) -> anyhow::Result<()>;
}

/// Where the upload's bytes live
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Vec<u8>),
}

/// One user-selected file. `size` comes from metadata so limits can be
/// enforced before reading.
#[derive(Debug, Clone)]
pub struct ImportFile {
    pub name: String,
    pub content_type: Option<String>,
    pub size: u64,
    pub source: FileSource,
}

impl ImportFile {
    /// Stat a file on disk without reading it
    pub async fn from_path(path: impl AsRef<Path>, content_type: Option<String>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            content_type,
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    pub fn from_bytes(name: impl Into<String>, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.map(String::from),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    async fn read(self) -> Result<Vec<u8>, ImportError> {
        match self.source {
            FileSource::Memory(bytes) => Ok(bytes),
            FileSource::Path(path) => tokio::fs::read(&path)
                .await
                .map_err(|e| ImportError::Io(format!("{}: {}", path.display(), e))),
        }
    }
}

/// Handle on the currently running attempt.
///
/// Dropping it while the attempt is still in flight marks it `Failed`, which
/// frees the pipeline for the next import.
struct ImportAttempt {
    id: Uuid,
    state: Arc<Mutex<ImportState>>,
}

impl ImportAttempt {
    fn advance(&self, next: ImportState) -> Result<(), ImportError> {
        let mut state = self.state.lock();
        if !state.can_transition_to(next) {
            return Err(ImportError::InvalidTransition { from: *state, to: next });
        }
        debug!(import_id = %self.id, "Import state {:?} -> {:?}", *state, next);
        *state = next;
        Ok(())
    }

    fn fail(&self, err: ImportError) -> ImportError {
        let mut state = self.state.lock();
        if state.is_in_flight() {
            debug!(import_id = %self.id, "Import state {:?} -> Failed", *state);
            *state = ImportState::Failed;
        }
        warn!(import_id = %self.id, "Import failed: {}", err);
        err
    }
}

impl Drop for ImportAttempt {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.is_in_flight() {
            warn!(import_id = %self.id, "Import abandoned in state {:?}", *state);
            *state = ImportState::Failed;
        }
    }
}

/// Single-flight import pipeline
pub struct ImportPipeline<B> {
    bulk: B,
    max_file_size: u64,
    state: Arc<Mutex<ImportState>>,
}

impl<B: BulkCreate> ImportPipeline<B> {
    pub fn new(bulk: B, max_file_size: u64) -> Self {
        Self {
            bulk,
            max_file_size,
            state: Arc::new(Mutex::new(ImportState::Idle)),
        }
    }

    pub fn from_config(bulk: B, config: &Config) -> Self {
        Self::new(bulk, config.max_file_size)
    }

    /// State of the latest attempt (`Idle` before the first one)
    pub fn current_state(&self) -> ImportState {
        *self.state.lock()
    }

    /// Run one import attempt to completion.
    pub async fn run(&self, file: ImportFile) -> Result<ImportReport, ImportError> {
        let attempt = self.begin()?;
        info!(import_id = %attempt.id, "Starting candidate import from '{}'", file.name);

        match self.execute(&attempt, file).await {
            Ok(report) => Ok(report),
            Err(e) => Err(attempt.fail(e)),
        }
    }

    fn begin(&self) -> Result<ImportAttempt, ImportError> {
        let mut state = self.state.lock();
        if state.is_in_flight() {
            return Err(ImportError::Busy);
        }
        // A new attempt starts fresh; the previous one's terminal state is kept
        // only until here.
        *state = ImportState::Validating;
        drop(state);

        Ok(ImportAttempt {
            id: Uuid::new_v4(),
            state: Arc::clone(&self.state),
        })
    }

    async fn execute(&self, attempt: &ImportAttempt, file: ImportFile) -> Result<ImportReport, ImportError> {
        let started = Instant::now();
        let started_at = Utc::now();

        let format = validate_upload(
            &file.name,
            file.content_type.as_deref(),
            file.size,
            self.max_file_size,
        )?;
        let file_name = file.name.clone();
        let bytes = file.read().await?;
        // Declared size may be stale
        check_size(bytes.len() as u64, self.max_file_size)?;

        attempt.advance(ImportState::Parsing)?;
        let rows = RowParser::from(format).parse(bytes)?;

        attempt.advance(ImportState::Normalizing)?;
        let batch = normalize_rows(&rows);
        let total_rows = rows.len();
        drop(rows);

        if batch.accepted.is_empty() {
            return Err(ImportError::NoValidRows {
                skipped: batch.skipped_count(),
            });
        }

        attempt.advance(ImportState::Reporting)?;
        let skipped_count = batch.skipped_count();
        if skipped_count > 0 {
            warn!(
                import_id = %attempt.id,
                "{} of {} row(s) skipped due to missing required fields",
                skipped_count, total_rows
            );
        }

        let mut report = ImportReport {
            import_id: attempt.id,
            file_name,
            format,
            started_at,
            duration_ms: 0,
            total_rows,
            accepted: batch.accepted,
            skipped_count,
            errors: batch.skipped,
        };

        self.bulk
            .create_candidates(&report.accepted)
            .await
            .map_err(|e| ImportError::BulkCreate(e.to_string()))?;

        attempt.advance(ImportState::Completed)?;
        report.duration_ms = started.elapsed().as_millis() as u64;

        info!(
            import_id = %attempt.id,
            "Candidate import completed in {}ms: {}/{} accepted",
            report.duration_ms,
            report.accepted.len(),
            total_rows
        );

        Ok(report)
    }
}
