//! Relationship resolution
//!
//! Turns a list of notes into similarity relationships by calling an external
//! inference service. Follows the project pattern (trait + impl + mock):
//! - `RelationshipResolver` trait: async interface
//! - `HttpRelationshipResolver`: JSON-over-HTTP client for the similarity service
//! - `MockRelationshipResolver`: canned responses for tests

#[cfg(test)]
pub mod mock;
pub mod provider;
pub mod traits;

#[cfg(test)]
pub use mock::MockRelationshipResolver;
pub use provider::{HttpRelationshipResolver, DEFAULT_RESOLVER_URL};
pub use traits::RelationshipResolver;
