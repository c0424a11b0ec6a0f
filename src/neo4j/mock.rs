//! In-memory mock implementation of GraphStore for testing.
//!
//! Writes are staged per transaction and only become visible on commit, so
//! rollback behavior can be asserted. Every store call is appended to an
//! event log, and a single failure can be injected at a chosen call.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::neo4j::models::{GraphEdge, GraphNode};
use crate::neo4j::traits::{GraphStore, GraphTransaction};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One call observed by the mock store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Begin,
    UpsertNote(String),
    CreateEdge(String, String),
    Commit,
    Rollback,
}

/// Where to inject a failure. Counters are 1-indexed and span the store's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailPoint {
    Begin,
    UpsertNote(usize),
    CreateEdge(usize),
    Commit,
}

#[derive(Default)]
struct MockState {
    nodes: BTreeMap<String, GraphNode>,
    edges: Vec<GraphEdge>,
    events: Vec<StoreEvent>,
    upserts: usize,
    edge_creates: usize,
    fail_at: Option<FailPoint>,
    statement_delay: Option<Duration>,
    commit_delay: Option<Duration>,
}

/// In-memory mock implementation of GraphStore for testing.
#[derive(Clone, Default)]
pub struct MockGraphStore {
    state: Arc<Mutex<MockState>>,
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the call identified by `point`.
    pub fn fail_at(self, point: FailPoint) -> Self {
        self.state.lock().unwrap().fail_at = Some(point);
        self
    }

    /// Sleep before every upsert / edge create.
    pub fn with_statement_delay(self, delay: Duration) -> Self {
        self.state.lock().unwrap().statement_delay = Some(delay);
        self
    }

    /// Sleep before applying a commit.
    pub fn with_commit_delay(self, delay: Duration) -> Self {
        self.state.lock().unwrap().commit_delay = Some(delay);
        self
    }

    /// Committed nodes, ordered by id.
    pub fn nodes(&self) -> Vec<GraphNode> {
        self.state.lock().unwrap().nodes.values().cloned().collect()
    }

    /// Committed edges, in commit order.
    pub fn edges(&self) -> Vec<GraphEdge> {
        self.state.lock().unwrap().edges.clone()
    }

    pub fn events(&self) -> Vec<StoreEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn count_events(&self, event: &StoreEvent) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn begin(&self) -> Result<Box<dyn GraphTransaction>> {
        let mut state = self.state.lock().unwrap();
        state.events.push(StoreEvent::Begin);
        if state.fail_at == Some(FailPoint::Begin) {
            anyhow::bail!("mock: connection refused");
        }
        Ok(Box::new(MockTransaction {
            state: self.state.clone(),
            staged_nodes: Vec::new(),
            staged_edges: Vec::new(),
            finished: false,
        }))
    }
}

struct MockTransaction {
    state: Arc<Mutex<MockState>>,
    staged_nodes: Vec<GraphNode>,
    staged_edges: Vec<GraphEdge>,
    finished: bool,
}

impl MockTransaction {
    fn ensure_open(&self) -> Result<()> {
        if self.finished {
            anyhow::bail!("mock: transaction already finished");
        }
        Ok(())
    }

    async fn delay(&self) {
        let delay = self.state.lock().unwrap().statement_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn node_exists(&self, state: &MockState, id: &str) -> bool {
        state.nodes.contains_key(id) || self.staged_nodes.iter().any(|n| n.id == id)
    }
}

#[async_trait]
impl GraphTransaction for MockTransaction {
    async fn upsert_note(&mut self, node: &GraphNode) -> Result<()> {
        self.ensure_open()?;
        self.delay().await;

        let mut state = self.state.lock().unwrap();
        state.events.push(StoreEvent::UpsertNote(node.id.clone()));
        state.upserts += 1;
        if state.fail_at == Some(FailPoint::UpsertNote(state.upserts)) {
            anyhow::bail!("mock: upsert of '{}' rejected", node.id);
        }
        drop(state);

        self.staged_nodes.push(node.clone());
        Ok(())
    }

    async fn create_edge(&mut self, edge: &GraphEdge) -> Result<()> {
        self.ensure_open()?;
        self.delay().await;

        let mut state = self.state.lock().unwrap();
        state
            .events
            .push(StoreEvent::CreateEdge(edge.from.clone(), edge.to.clone()));
        state.edge_creates += 1;
        if state.fail_at == Some(FailPoint::CreateEdge(state.edge_creates)) {
            anyhow::bail!("mock: edge '{}' -> '{}' rejected", edge.from, edge.to);
        }
        for id in [&edge.from, &edge.to] {
            if !self.node_exists(&state, id) {
                anyhow::bail!("mock: endpoint '{}' not found", id);
            }
        }
        drop(state);

        self.staged_edges.push(edge.clone());
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        self.ensure_open()?;
        let delay = self.state.lock().unwrap().commit_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.finished = true;

        let mut state = self.state.lock().unwrap();
        state.events.push(StoreEvent::Commit);
        if state.fail_at == Some(FailPoint::Commit) {
            anyhow::bail!("mock: commit failed");
        }
        for node in self.staged_nodes.drain(..) {
            state.nodes.insert(node.id.clone(), node);
        }
        state.edges.append(&mut self.staged_edges);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.finished = true;

        self.state.lock().unwrap().events.push(StoreEvent::Rollback);
        self.staged_nodes.clear();
        self.staged_edges.clear();
        Ok(())
    }
}
