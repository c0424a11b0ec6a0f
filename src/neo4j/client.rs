//! Neo4j client for writing the note graph

use super::models::{GraphEdge, GraphNode};
use super::traits::{GraphStore, GraphTransaction};
use anyhow::{Context, Result};
use async_trait::async_trait;
use neo4rs::{query, Graph, Txn};
use std::sync::Arc;

const UPSERT_NOTE: &str = "MERGE (n:Note {id: $id}) SET n.content = $content";

const CREATE_RELATED_TO: &str = "MATCH (a:Note {id: $note_a}), (b:Note {id: $note_b}) \
     CREATE (a)-[:RELATED_TO {similarity: $similarity}]->(b) \
     RETURN count(*) AS created";

/// Client for Neo4j operations
#[derive(Clone)]
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

impl Neo4jClient {
    /// Create a new Neo4j client
    pub async fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .with_context(|| format!("Failed to connect to Neo4j at {}", uri))?;

        Ok(Self {
            graph: Arc::new(graph),
        })
    }

    /// Underlying driver handle, for ad-hoc reads (tests, diagnostics)
    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn begin(&self) -> Result<Box<dyn GraphTransaction>> {
        let txn = self
            .graph
            .start_txn()
            .await
            .context("Failed to begin Neo4j transaction")?;
        Ok(Box::new(Neo4jTransaction { txn: Some(txn) }))
    }
}

/// An explicit Neo4j transaction bound to one pooled connection.
pub struct Neo4jTransaction {
    txn: Option<Txn>,
}

impl Neo4jTransaction {
    fn open(&mut self) -> Result<&mut Txn> {
        self.txn
            .as_mut()
            .context("Neo4j transaction already finished")
    }

    fn take(&mut self) -> Result<Txn> {
        self.txn.take().context("Neo4j transaction already finished")
    }
}

#[async_trait]
impl GraphTransaction for Neo4jTransaction {
    async fn upsert_note(&mut self, node: &GraphNode) -> Result<()> {
        let q = query(UPSERT_NOTE)
            .param("id", node.id.as_str())
            .param("content", node.content.as_str());
        self.open()?.run(q).await?;
        Ok(())
    }

    async fn create_edge(&mut self, edge: &GraphEdge) -> Result<()> {
        let q = query(CREATE_RELATED_TO)
            .param("note_a", edge.from.as_str())
            .param("note_b", edge.to.as_str())
            .param("similarity", edge.similarity);
        let txn = self.open()?;
        let mut rows = txn.execute(q).await?;
        let mut created: i64 = 0;
        while let Some(row) = rows.next(txn.handle()).await? {
            created += row.get::<i64>("created")?;
        }
        if created == 0 {
            anyhow::bail!(
                "Cannot relate '{}' to '{}': endpoint note not found",
                edge.from,
                edge.to
            );
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        self.take()?.commit().await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.take()?.rollback().await?;
        Ok(())
    }
}
