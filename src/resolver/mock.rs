//! Mock relationship resolver for tests
//!
//! Returns a canned result and records every note list it was asked about.

use super::traits::RelationshipResolver;
use crate::notes::{Note, Relationship};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

pub struct MockRelationshipResolver {
    response: Result<Vec<Relationship>, String>,
    pub calls: Mutex<Vec<Vec<Note>>>,
}

impl MockRelationshipResolver {
    /// Resolver that always answers with `relationships`.
    pub fn returning(relationships: Vec<Relationship>) -> Self {
        Self {
            response: Ok(relationships),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Resolver that always fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RelationshipResolver for MockRelationshipResolver {
    async fn resolve(&self, notes: &[Note]) -> Result<Vec<Relationship>> {
        self.calls.lock().unwrap().push(notes.to_vec());
        match &self.response {
            Ok(rels) => Ok(rels.clone()),
            Err(msg) => Err(anyhow::anyhow!(msg.clone())),
        }
    }
}
