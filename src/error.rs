//! Error taxonomy for the ingestion pipeline
//!
//! Every failure of a pipeline run falls into exactly one of three stages:
//! reading the note tree, resolving relationships, or persisting the graph.
//! Callers branch on [`PipelineError`] variants instead of matching strings.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single pipeline run, tagged by the stage that failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The note tree could not be read. Nothing downstream was called.
    #[error("failed to extract notes from {}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The similarity service failed or returned unusable data.
    /// The graph store was never touched.
    #[error("relationship resolution failed")]
    Resolution(#[source] anyhow::Error),

    /// Writing to the graph store failed; the transaction was rolled back.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl PipelineError {
    /// Short stage name for log fields.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Input { .. } => "input",
            PipelineError::Resolution(_) => "resolution",
            PipelineError::Persistence(_) => "persistence",
        }
    }
}

/// Failure inside [`GraphWriter::persist`](crate::graph::GraphWriter::persist).
///
/// Any of these aborts the whole transaction.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to begin graph transaction")]
    Begin(#[source] anyhow::Error),

    #[error("failed to upsert note node '{id}'")]
    UpsertNote {
        id: String,
        #[source]
        cause: anyhow::Error,
    },

    #[error("failed to create RELATED_TO edge '{from}' -> '{to}'")]
    CreateEdge {
        from: String,
        to: String,
        #[source]
        cause: anyhow::Error,
    },

    #[error("failed to commit graph transaction")]
    Commit(#[source] anyhow::Error),

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: String,
        timeout: Duration,
    },
}
