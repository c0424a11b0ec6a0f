//! HTTP relationship resolver
//!
//! POSTs `{"notes": [{"title", "content"}, ...]}` to the similarity service and
//! expects a JSON array of `{"note1", "note2", "similarity"}` back.

use super::traits::RelationshipResolver;
use crate::notes::{Note, Relationship};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Default endpoint of the similarity service
pub const DEFAULT_RESOLVER_URL: &str = "http://localhost:5000/relationships";

/// Client for the similarity inference service.
///
/// Cheaply cloneable (shares the reqwest client internally).
#[derive(Clone)]
pub struct HttpRelationshipResolver {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Serialize)]
struct RelationshipRequest<'a> {
    notes: &'a [Note],
}

impl HttpRelationshipResolver {
    /// Create a resolver for `url`; every request is bounded by `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RelationshipResolver for HttpRelationshipResolver {
    async fn resolve(&self, notes: &[Note]) -> Result<Vec<Relationship>> {
        tracing::info!("Sending {} notes to similarity service", notes.len());

        let response = self
            .client
            .post(&self.url)
            .json(&RelationshipRequest { notes })
            .send()
            .await
            .with_context(|| format!("Failed to connect to similarity service at {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Similarity service returned {}: {}", status.as_u16(), body);
        }

        let relationships: Vec<Relationship> = response
            .json()
            .await
            .context("Failed to parse similarity service response")?;

        tracing::info!("Received {} relationships", relationships.len());
        Ok(relationships)
    }
}
