use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::models::Flashcard;

/// Progress through a study session.
/// `studied` counts the cards before the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StudyStats {
    pub total: usize,
    pub studied: usize,
    pub remaining: usize,
}

/// Walks through a deck's cards one at a time, question side first.
#[derive(Debug, Clone)]
pub struct StudySession {
    cards: Vec<Flashcard>,
    index: usize,
    revealed: bool,
}

impl StudySession {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self {
            cards,
            index: 0,
            revealed: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    /// Zero-based position of the current card
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        !self.cards.is_empty() && self.index == self.cards.len() - 1
    }

    /// Whether the answer side of the current card is showing
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn flip(&mut self) {
        if !self.cards.is_empty() {
            self.revealed = !self.revealed;
        }
    }

    /// Moves to the next card. Returns false (and stays put) on the last card.
    pub fn next_card(&mut self) -> bool {
        if self.index + 1 < self.cards.len() {
            self.go_to(self.index + 1)
        } else {
            false
        }
    }

    /// Moves to the previous card. Returns false (and stays put) on the first card.
    pub fn previous_card(&mut self) -> bool {
        if self.index > 0 {
            self.go_to(self.index - 1)
        } else {
            false
        }
    }

    /// Jumps to `index`; out-of-range indexes are ignored
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.cards.len() {
            return false;
        }
        self.index = index;
        self.revealed = false;
        true
    }

    pub fn restart(&mut self) {
        self.index = 0;
        self.revealed = false;
    }

    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::thread_rng());
    }

    /// Reorders the cards randomly and starts over from the first one
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.restart();
    }

    pub fn stats(&self) -> StudyStats {
        let total = self.cards.len();
        if total == 0 {
            return StudyStats {
                total: 0,
                studied: 0,
                remaining: 0,
            };
        }

        StudyStats {
            total,
            studied: self.index,
            remaining: total - self.index,
        }
    }

    /// Share of the deck reached so far, counting the current card (0-100)
    pub fn progress_percent(&self) -> f64 {
        if self.cards.is_empty() {
            return 0.0;
        }
        (self.index + 1) as f64 * 100.0 / self.cards.len() as f64
    }
}
