// Models module - Database entity representations

pub mod deck;
pub mod flashcard;

pub use deck::{CreateDeckData, Deck, UpdateDeckData};
pub use flashcard::{CreateFlashcardData, Flashcard, UpdateFlashcardData};
