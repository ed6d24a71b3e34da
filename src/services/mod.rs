// Services module - Business logic

pub mod decks;
pub mod flashcards;
pub mod validation;
