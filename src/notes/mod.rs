//! Note extraction
//!
//! Reads a tree of Markdown documents (an Obsidian-style vault) into [`Note`]s
//! and defines the [`Relationship`] triples produced from them.

pub mod models;
pub mod source;

pub use models::{Note, Relationship};
pub use source::{NoteSource, VaultNoteSource};
