//! Note source: walks a document tree and reads qualifying files

use super::models::Note;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Produces the list of notes for a pipeline run.
///
/// An `Err` means the list is unusable and must not be passed downstream.
/// Order is traversal order; consumers must not rely on it for correctness.
#[async_trait]
pub trait NoteSource: Send + Sync {
    async fn extract(&self, root: &Path) -> Result<Vec<Note>>;
}

/// Reads every file with a given extension below a root directory.
#[derive(Debug, Clone)]
pub struct VaultNoteSource {
    extension: String,
    exclude_dirs: Vec<String>,
}

impl Default for VaultNoteSource {
    fn default() -> Self {
        Self::new("md")
    }
}

impl VaultNoteSource {
    /// Create a source for files ending in `extension` (`"md"` and `".md"` are equivalent).
    pub fn new(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            exclude_dirs: Vec::new(),
        }
    }

    /// Skip directories with any of these names (e.g. `.trash`).
    pub fn with_exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.exclude_dirs = dirs;
        self
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|name| self.exclude_dirs.iter().any(|d| d == name))
                .unwrap_or(false)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.extension)
            .unwrap_or(false)
    }

    /// Blocking walk. Any unreadable entry aborts the extraction.
    pub fn extract_blocking(&self, root: &Path) -> Result<Vec<Note>> {
        tracing::info!("Extracting notes from {}", root.display());

        let mut notes = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e));

        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
            // Symlinked notes are read through the link; symlinked dirs are not descended.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file || !self.matches_extension(entry.path()) {
                continue;
            }

            let bytes = std::fs::read(entry.path())
                .with_context(|| format!("Failed to read note {}", entry.path().display()))?;
            let title = entry.file_name().to_string_lossy().into_owned();
            notes.push(Note {
                title,
                content: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        warn_on_title_collisions(&notes);
        tracing::info!("Extracted {} notes", notes.len());
        Ok(notes)
    }
}

#[async_trait]
impl NoteSource for VaultNoteSource {
    async fn extract(&self, root: &Path) -> Result<Vec<Note>> {
        let source = self.clone();
        let root: PathBuf = root.to_path_buf();
        tokio::task::spawn_blocking(move || source.extract_blocking(&root))
            .await
            .context("Note extraction task panicked")?
    }
}

/// Titles are graph ids; duplicates silently merge into one node downstream.
fn warn_on_title_collisions(notes: &[Note]) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for note in notes {
        *counts.entry(note.title.as_str()).or_default() += 1;
    }
    for (title, count) in counts.into_iter().filter(|(_, c)| *c > 1) {
        tracing::warn!(
            title,
            count,
            "Duplicate note title; these notes will share one graph node"
        );
    }
}
