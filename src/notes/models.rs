//! Note and relationship models shared by every pipeline stage

use serde::{Deserialize, Serialize};

/// A single document from the note tree.
///
/// `title` is the document's file name and doubles as its graph identifier.
/// It is not unique across sub-directories: two `ideas.md` files in
/// different folders end up as the same graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,
    pub content: String,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A semantic link between two notes as reported by the similarity service.
///
/// Semantically undirected, stored as `note_a -> note_b`. The score is opaque
/// to the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(rename = "note1")]
    pub note_a: String,
    #[serde(rename = "note2")]
    pub note_b: String,
    pub similarity: f64,
}

impl Relationship {
    pub fn new(note_a: impl Into<String>, note_b: impl Into<String>, similarity: f64) -> Self {
        Self {
            note_a: note_a.into(),
            note_b: note_b.into(),
            similarity,
        }
    }

    /// True when the score is a finite number in `[0, 1]`.
    pub fn has_valid_similarity(&self) -> bool {
        self.similarity.is_finite() && (0.0..=1.0).contains(&self.similarity)
    }
}
