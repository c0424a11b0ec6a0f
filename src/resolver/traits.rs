//! RelationshipResolver trait definition

use crate::notes::{Note, Relationship};
use anyhow::Result;
use async_trait::async_trait;

/// Oracle that scores pairs of notes.
///
/// The pipeline does not check that returned identifiers match the titles it
/// sent, nor that scores fall in any range.
#[async_trait]
pub trait RelationshipResolver: Send + Sync {
    /// Resolve relationships for `notes`. Called even when `notes` is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable, answers with a
    /// non-success status, or sends a body that is not a relationship list.
    async fn resolve(&self, notes: &[Note]) -> Result<Vec<Relationship>>;
}
