//! Weak card records returned by the review service

use serde::{Deserialize, Serialize};
use std::fmt;

/// A flashcard flagged for remedial study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeakCard {
    pub card_id: i64,
    pub lapses: i64,
    pub ease: i64,
    pub interval: i64,
    pub question: String,
    pub answer: String,
    pub advice: String,
    pub deck_name: String,
}

impl fmt::Display for WeakCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Card ID: {}, Lapses: {}, Ease: {}, Interval: {}",
            self.card_id, self.lapses, self.ease, self.interval
        )?;
        writeln!(f, "Question: {}", self.question)?;
        writeln!(f, "Answer: {}\n", self.answer)?;
        writeln!(f, "Advice: {}\n", self.advice)?;
        writeln!(f, "Deck Name: {}\n", self.deck_name)
    }
}

/// Render every card in service order.
pub fn render_cards(cards: &[WeakCard]) -> String {
    cards.iter().map(|c| c.to_string()).collect()
}
