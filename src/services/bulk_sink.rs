//! JSON hand-off for accepted candidates
//!
//! Stands in for the remote bulk-create call when the pipeline runs from the
//! command line: the accepted batch is written as a JSON array to a file, or
//! to stdout when no path is given.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::services::import_pipeline::BulkCreate;
use crate::types::CandidateDraft;

pub struct JsonSink {
    output: Option<PathBuf>,
}

impl JsonSink {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }
}

#[async_trait]
impl BulkCreate for JsonSink {
    async fn create_candidates(&self, candidates: &[CandidateDraft]) -> Result<()> {
        let mut payload = serde_json::to_vec_pretty(candidates)?;
        payload.push(b'\n');

        match &self.output {
            Some(path) => {
                tokio::fs::write(path, &payload)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!("Wrote {} candidate(s) to {}", candidates.len(), path.display());
            }
            None => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(&payload).await?;
                stdout.flush().await?;
            }
        }

        Ok(())
    }
}
