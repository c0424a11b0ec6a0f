//! Weak-card review reader
//!
//! Fetches flashcards that the review service flags as under-performing and
//! renders them for study. Independent of the graph pipeline.

pub mod client;
pub mod models;

pub use client::{ReviewClient, DEFAULT_REVIEW_URL};
pub use models::{render_cards, WeakCard};
