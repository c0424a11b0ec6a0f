//! Main pipeline runner

use crate::error::PipelineError;
use crate::graph::{GraphWriter, PersistReport};
use crate::notes::{NoteSource, Relationship};
use crate::resolver::RelationshipResolver;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Optional checks applied between resolution and persistence.
/// Both are off by default so the resolver's output is written verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Reject the run if any similarity is not a finite number in `[0, 1]`
    pub validate_similarity: bool,
    /// Drop repeated `(note_a, note_b)` pairs, keeping the first
    pub dedup_relationships: bool,
}

/// Summary of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub notes: usize,
    pub relationships: usize,
    pub persisted: PersistReport,
}

/// Sequences note extraction, relationship resolution and graph persistence.
/// Stops at the first failing stage; nothing is retried.
pub struct Orchestrator {
    source: Arc<dyn NoteSource>,
    resolver: Arc<dyn RelationshipResolver>,
    writer: GraphWriter,
    options: PipelineOptions,
}

impl Orchestrator {
    pub fn new(
        source: Arc<dyn NoteSource>,
        resolver: Arc<dyn RelationshipResolver>,
        writer: GraphWriter,
        options: PipelineOptions,
    ) -> Self {
        Self {
            source,
            resolver,
            writer,
            options,
        }
    }

    /// Run the pipeline over the note tree rooted at `note_path`.
    pub async fn run(&self, note_path: &Path) -> Result<RunReport, PipelineError> {
        tracing::info!("Starting pipeline run for {}", note_path.display());

        let notes = self
            .source
            .extract(note_path)
            .await
            .map_err(|source| PipelineError::Input {
                path: note_path.to_path_buf(),
                source,
            })?;

        let relationships = self
            .resolver
            .resolve(&notes)
            .await
            .map_err(PipelineError::Resolution)?;
        let relationships = self.prepare(relationships)?;

        let persisted = self.writer.persist(&relationships).await?;

        tracing::info!(
            "Pipeline complete: {} notes, {} relationships persisted",
            notes.len(),
            relationships.len()
        );
        Ok(RunReport {
            notes: notes.len(),
            relationships: relationships.len(),
            persisted,
        })
    }

    fn prepare(&self, relationships: Vec<Relationship>) -> Result<Vec<Relationship>, PipelineError> {
        if self.options.validate_similarity {
            if let Some(bad) = relationships.iter().find(|r| !r.has_valid_similarity()) {
                return Err(PipelineError::Resolution(anyhow::anyhow!(
                    "similarity {} for '{}' -> '{}' is outside [0, 1]",
                    bad.similarity,
                    bad.note_a,
                    bad.note_b
                )));
            }
        }

        if !self.options.dedup_relationships {
            return Ok(relationships);
        }

        let before = relationships.len();
        let mut seen = HashSet::new();
        let deduped: Vec<Relationship> = relationships
            .into_iter()
            .filter(|r| seen.insert((r.note_a.clone(), r.note_b.clone())))
            .collect();
        if deduped.len() < before {
            tracing::info!(
                "Dropped {} duplicate relationships",
                before - deduped.len()
            );
        }
        Ok(deduped)
    }
}
