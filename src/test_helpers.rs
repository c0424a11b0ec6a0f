//! Test helper factories

use crate::neo4j::models::GraphNode;
use crate::notes::Relationship;

pub fn rel(a: &str, b: &str, similarity: f64) -> Relationship {
    Relationship::new(a, b, similarity)
}

pub fn node(id: &str, content: &str) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        content: content.to_string(),
    }
}
