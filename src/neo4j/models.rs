//! Graph entities persisted in Neo4j

use serde::{Deserialize, Serialize};

/// A `(:Note)` node, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub content: String,
}

impl GraphNode {
    /// A node known only by its identifier (content not available yet).
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: String::new(),
        }
    }
}

/// A `[:RELATED_TO]` edge, stored directed `from -> to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub similarity: f64,
}
