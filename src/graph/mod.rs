//! Note graph persistence.
//!
//! ```text
//! Vec<Relationship> ──► GraphWriter ──► TransactionGuard ──► GraphStore (Neo4j)
//!                        batches            commit once / rollback
//! ```

pub mod writer;

pub use writer::{GraphWriter, PersistReport, TransactionGuard, WriterConfig};
