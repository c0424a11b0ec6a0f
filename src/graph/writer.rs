//! Relationship graph writer.
//!
//! Persists similarity relationships as `(:Note)-[:RELATED_TO]->(:Note)` in a
//! single transaction per call. Input is processed in fixed-size batches for
//! progress reporting only; the whole call commits once or not at all.
//!
//! Node writes are idempotent (`MERGE` on id). Edge writes are not: persisting
//! the same relationship twice yields two edges.

use crate::error::PersistenceError;
use crate::neo4j::models::{GraphEdge, GraphNode};
use crate::neo4j::traits::{GraphStore, GraphTransaction};
use crate::notes::Relationship;
use anyhow::Context;
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Tuning knobs for [`GraphWriter`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Relationships per progress batch (0 is treated as 1)
    pub batch_size: usize,
    /// Bound on acquiring a session and beginning the transaction
    #[serde(with = "secs")]
    pub begin_timeout: Duration,
    /// Bound on each node upsert and each edge create
    #[serde(with = "secs")]
    pub statement_timeout: Duration,
    /// Bound on commit, and on rollback after a failure
    #[serde(with = "secs")]
    pub commit_timeout: Duration,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            begin_timeout: Duration::from_secs(30),
            statement_timeout: Duration::from_secs(60),
            commit_timeout: Duration::from_secs(120),
        }
    }
}

/// Durations are written as whole seconds in YAML (`begin_timeout: 30`).
mod secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

/// Counters for one successful [`GraphWriter::persist`] call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub relationships: usize,
    pub batches: usize,
    pub nodes_upserted: usize,
    pub edges_created: usize,
}

/// Owns an open transaction until it is committed or rolled back.
///
/// If dropped while still open (the owning future was cancelled, or a panic
/// unwound through it) a rollback is spawned on the current Tokio runtime.
pub struct TransactionGuard {
    txn: Option<Box<dyn GraphTransaction>>,
}

impl TransactionGuard {
    pub fn new(txn: Box<dyn GraphTransaction>) -> Self {
        Self { txn: Some(txn) }
    }

    fn open(&mut self) -> anyhow::Result<&mut Box<dyn GraphTransaction>> {
        self.txn.as_mut().context("graph transaction already released")
    }

    pub async fn upsert_note(&mut self, node: &GraphNode) -> anyhow::Result<()> {
        self.open()?.upsert_note(node).await
    }

    pub async fn create_edge(&mut self, edge: &GraphEdge) -> anyhow::Result<()> {
        self.open()?.create_edge(edge).await
    }

    /// Commit and release. The commit is confirmed before this returns `Ok`.
    ///
    /// On timeout the server-side outcome is unknown; a rollback is attempted
    /// and [`PersistenceError::Timeout`] is returned.
    pub async fn commit(mut self, limit: Duration) -> Result<(), PersistenceError> {
        let txn = self.open().map_err(PersistenceError::Commit)?;
        match tokio::time::timeout(limit, txn.commit()).await {
            Ok(result) => {
                self.txn = None;
                result.map_err(PersistenceError::Commit)
            }
            Err(_) => {
                tracing::error!(
                    "Commit timed out after {:?}; outcome unknown, attempting rollback",
                    limit
                );
                self.rollback(limit).await;
                Err(PersistenceError::Timeout {
                    operation: "commit".to_string(),
                    timeout: limit,
                })
            }
        }
    }

    /// Roll back and release. Failures are logged, never returned: the caller
    /// is already reporting the error that triggered the rollback.
    pub async fn rollback(mut self, limit: Duration) {
        let Some(mut txn) = self.txn.take() else {
            return;
        };
        match tokio::time::timeout(limit, txn.rollback()).await {
            Ok(Ok(())) => tracing::debug!("Graph transaction rolled back"),
            Ok(Err(e)) => tracing::error!("Failed to roll back graph transaction: {:#}", e),
            Err(_) => tracing::error!("Rollback timed out after {:?}", limit),
        }
    }
}

impl Drop for TransactionGuard {
    fn drop(&mut self) {
        let Some(mut txn) = self.txn.take() else {
            return;
        };
        tracing::warn!("Graph transaction released without commit; rolling back");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = txn.rollback().await {
                        tracing::error!("Failed to roll back abandoned transaction: {:#}", e);
                    }
                });
            }
            Err(_) => {
                tracing::error!("No Tokio runtime to roll back abandoned transaction");
            }
        }
    }
}

/// Run `fut`, failing with [`PersistenceError::Timeout`] after `limit`.
async fn bounded<T>(
    operation: impl FnOnce() -> String,
    limit: Duration,
    fut: impl Future<Output = T>,
) -> Result<T, PersistenceError> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| PersistenceError::Timeout {
            operation: operation(),
            timeout: limit,
        })
}

/// Writes relationship lists into a [`GraphStore`].
pub struct GraphWriter {
    store: Arc<dyn GraphStore>,
    config: WriterConfig,
}

impl GraphWriter {
    pub fn new(store: Arc<dyn GraphStore>, config: WriterConfig) -> Self {
        Self { store, config }
    }

    /// Persist `relationships` in input order as one transaction.
    ///
    /// For each relationship: upsert `note_a`, upsert `note_b` (both with empty
    /// content), then create `note_a -> note_b`. The first failure rolls back
    /// everything written by this call, including earlier batches.
    /// An empty slice succeeds without contacting the store.
    pub async fn persist(
        &self,
        relationships: &[Relationship],
    ) -> Result<PersistReport, PersistenceError> {
        if relationships.is_empty() {
            tracing::debug!("No relationships to persist");
            return Ok(PersistReport::default());
        }

        let batch_size = self.config.batch_size.max(1);
        tracing::info!(
            "Persisting {} relationships in {} batches",
            relationships.len(),
            relationships.len().div_ceil(batch_size)
        );

        let txn = bounded(
            || "begin transaction".to_string(),
            self.config.begin_timeout,
            self.store.begin(),
        )
        .await?
        .map_err(PersistenceError::Begin)?;
        let mut guard = TransactionGuard::new(txn);

        let written = self.write_batches(&mut guard, relationships, batch_size).await;
        match written {
            Ok(report) => {
                tracing::info!("Committing graph transaction");
                guard.commit(self.config.commit_timeout).await?;
                tracing::info!(
                    "Committed {} relationships ({} node upserts, {} edges)",
                    report.relationships,
                    report.nodes_upserted,
                    report.edges_created
                );
                Ok(report)
            }
            Err(e) => {
                tracing::warn!("Rolling back graph transaction: {}", e);
                guard.rollback(self.config.commit_timeout).await;
                Err(e)
            }
        }
    }

    async fn write_batches(
        &self,
        guard: &mut TransactionGuard,
        relationships: &[Relationship],
        batch_size: usize,
    ) -> Result<PersistReport, PersistenceError> {
        let total_batches = relationships.len().div_ceil(batch_size);
        let mut report = PersistReport::default();

        for (index, batch) in relationships.chunks(batch_size).enumerate() {
            for rel in batch {
                self.upsert_node(guard, &rel.note_a).await?;
                self.upsert_node(guard, &rel.note_b).await?;
                report.nodes_upserted += 2;

                self.relate(guard, rel).await?;
                report.edges_created += 1;
            }

            report.batches += 1;
            report.relationships += batch.len();
            tracing::info!(
                "Processed batch {}/{} of {} relationships",
                index + 1,
                total_batches,
                batch.len()
            );
        }

        Ok(report)
    }

    async fn upsert_node(
        &self,
        guard: &mut TransactionGuard,
        id: &str,
    ) -> Result<(), PersistenceError> {
        tracing::debug!(id, "Upserting note node");
        let node = GraphNode::placeholder(id);
        bounded(
            || format!("upsert of note '{}'", id),
            self.config.statement_timeout,
            guard.upsert_note(&node),
        )
        .await?
        .map_err(|cause| PersistenceError::UpsertNote {
            id: id.to_string(),
            cause,
        })
    }

    async fn relate(
        &self,
        guard: &mut TransactionGuard,
        rel: &Relationship,
    ) -> Result<(), PersistenceError> {
        tracing::debug!(from = %rel.note_a, to = %rel.note_b, similarity = rel.similarity, "Creating edge");
        let edge = GraphEdge {
            from: rel.note_a.clone(),
            to: rel.note_b.clone(),
            similarity: rel.similarity,
        };
        bounded(
            || format!("edge '{}' -> '{}'", rel.note_a, rel.note_b),
            self.config.statement_timeout,
            guard.create_edge(&edge),
        )
        .await?
        .map_err(|cause| PersistenceError::CreateEdge {
            from: rel.note_a.clone(),
            to: rel.note_b.clone(),
            cause,
        })
    }
}
