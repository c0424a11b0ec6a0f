//! Neo4j client and models for the note graph

pub mod client;
pub mod models;
pub mod traits;

pub use client::{Neo4jClient, Neo4jTransaction};
pub use models::*;
pub use traits::{GraphStore, GraphTransaction};

#[cfg(test)]
pub(crate) mod mock;
