use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{CreateFlashcardData, Flashcard, UpdateFlashcardData};
use crate::services::validation::{parse_id, Validator, CARD_TEXT_MAX_CHARS};

const DECK_NOT_FOUND: &str = "Deck not found";
const FLASHCARD_NOT_FOUND: &str = "Flashcard not found";

/// Lists a deck's flashcards, newest first. The deck itself must exist.
#[tracing::instrument(skip(store))]
pub async fn list_flashcards_by_deck(store: &dyn Store, deck_id: &str) -> Result<Vec<Flashcard>> {
    let deck_id = parse_id(deck_id, "deck")?;

    if !store.deck_exists(deck_id).await? {
        return Err(AppError::NotFound(DECK_NOT_FOUND));
    }

    let flashcards = store.list_flashcards_by_deck(deck_id).await?;
    tracing::debug!(%deck_id, count = flashcards.len(), "Listed flashcards");
    Ok(flashcards)
}

#[tracing::instrument(skip(store))]
pub async fn get_flashcard(store: &dyn Store, id: &str) -> Result<Flashcard> {
    let id = parse_id(id, "flashcard")?;

    store
        .find_flashcard(id)
        .await?
        .ok_or(AppError::NotFound(FLASHCARD_NOT_FOUND))
}

/// Creates a flashcard in an existing deck.
///
/// Field problems (including a missing or malformed `deck_id`) are reported
/// as validation failures; a well-formed id that names no deck is
/// `NotFound` and nothing is stored.
#[tracing::instrument(skip(store, question, answer))]
pub async fn create_flashcard(
    store: &dyn Store,
    question: Option<&str>,
    answer: Option<&str>,
    deck_id: Option<&str>,
) -> Result<Flashcard> {
    let mut validator = Validator::new();
    let question = validator.required_text("question", "Question", question, CARD_TEXT_MAX_CHARS);
    let answer = validator.required_text("answer", "Answer", answer, CARD_TEXT_MAX_CHARS);
    let deck_id = validator.required_id("deckId", "Deck ID", "Invalid deck ID", deck_id);
    validator.finish()?;

    let deck_id = deck_id.ok_or(AppError::InvalidIdentifier("deck"))?;

    if !store.deck_exists(deck_id).await? {
        return Err(AppError::NotFound(DECK_NOT_FOUND));
    }

    let flashcard = store
        .insert_flashcard(CreateFlashcardData {
            question,
            answer,
            deck_id,
        })
        .await?;

    tracing::info!(flashcard_id = %flashcard.id, %deck_id, "Created new flashcard");
    Ok(flashcard)
}

/// Replaces question and answer. The card stays in its deck.
#[tracing::instrument(skip(store, question, answer))]
pub async fn update_flashcard(
    store: &dyn Store,
    id: &str,
    question: Option<&str>,
    answer: Option<&str>,
) -> Result<Flashcard> {
    let mut validator = Validator::new();
    let question = validator.required_text("question", "Question", question, CARD_TEXT_MAX_CHARS);
    let answer = validator.required_text("answer", "Answer", answer, CARD_TEXT_MAX_CHARS);
    validator.finish()?;

    let id = parse_id(id, "flashcard")?;

    let flashcard = store
        .update_flashcard(id, UpdateFlashcardData { question, answer })
        .await?
        .ok_or(AppError::NotFound(FLASHCARD_NOT_FOUND))?;

    tracing::info!(flashcard_id = %flashcard.id, "Updated flashcard");
    Ok(flashcard)
}

#[tracing::instrument(skip(store))]
pub async fn delete_flashcard(store: &dyn Store, id: &str) -> Result<()> {
    let id = parse_id(id, "flashcard")?;

    if !store.delete_flashcard(id).await? {
        return Err(AppError::NotFound(FLASHCARD_NOT_FOUND));
    }

    tracing::info!(flashcard_id = %id, "Deleted flashcard");
    Ok(())
}
