//! GraphStore trait definition
//!
//! Abstracts the session/transaction boundary of the graph database so the
//! writer can be exercised against an in-memory mock.

use crate::neo4j::models::{GraphEdge, GraphNode};
use anyhow::Result;
use async_trait::async_trait;

/// A graph database that hands out explicit transactions.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Acquire a session and begin a transaction on it.
    async fn begin(&self) -> Result<Box<dyn GraphTransaction>>;
}

/// An open transaction. Nothing written through it is visible to other
/// sessions until [`commit`](Self::commit) succeeds.
///
/// `commit` and `rollback` finish the transaction; any call after that is an
/// error.
#[async_trait]
pub trait GraphTransaction: Send {
    /// `MERGE (n:Note {id: $id}) SET n.content = $content`
    async fn upsert_note(&mut self, node: &GraphNode) -> Result<()>;

    /// `MATCH (a:Note {id: $a}), (b:Note {id: $b}) CREATE (a)-[:RELATED_TO {similarity: $s}]->(b)`
    ///
    /// Fails when either endpoint note does not exist.
    async fn create_edge(&mut self, edge: &GraphEdge) -> Result<()>;

    async fn commit(&mut self) -> Result<()>;

    async fn rollback(&mut self) -> Result<()>;
}
