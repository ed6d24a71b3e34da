use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{CreateDeckData, Deck, UpdateDeckData};
use crate::services::validation::{
    parse_id, Validator, DECK_DESCRIPTION_MAX_CHARS, DECK_NAME_MAX_CHARS,
};

const DECK_NOT_FOUND: &str = "Deck not found";

/// Trims and validates deck fields, returning `(name, description)`
fn validate_deck_fields(name: Option<&str>, description: Option<&str>) -> Result<(String, String)> {
    let mut validator = Validator::new();
    let name = validator.required_text("name", "Deck name", name, DECK_NAME_MAX_CHARS);
    let description = validator.optional_text(
        "description",
        "Description",
        description,
        DECK_DESCRIPTION_MAX_CHARS,
    );
    validator.finish()?;

    Ok((name, description))
}

/// Lists every deck, newest first, each with its current card count
#[tracing::instrument(skip(store))]
pub async fn list_decks(store: &dyn Store) -> Result<Vec<Deck>> {
    let decks = store.list_decks().await?;
    tracing::debug!(count = decks.len(), "Listed decks");
    Ok(decks)
}

#[tracing::instrument(skip(store))]
pub async fn get_deck(store: &dyn Store, id: &str) -> Result<Deck> {
    let id = parse_id(id, "deck")?;

    store
        .find_deck(id)
        .await?
        .ok_or(AppError::NotFound(DECK_NOT_FOUND))
}

#[tracing::instrument(skip(store, description))]
pub async fn create_deck(
    store: &dyn Store,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<Deck> {
    let (name, description) = validate_deck_fields(name, description)?;

    let deck = store
        .insert_deck(CreateDeckData { name, description })
        .await?;

    tracing::info!(deck_id = %deck.id, "Created new deck");
    Ok(deck)
}

/// Replaces a deck's name and description. The id and `created_at` never change.
#[tracing::instrument(skip(store, description))]
pub async fn update_deck(
    store: &dyn Store,
    id: &str,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<Deck> {
    let (name, description) = validate_deck_fields(name, description)?;
    let id = parse_id(id, "deck")?;

    let deck = store
        .update_deck(id, UpdateDeckData { name, description })
        .await?
        .ok_or(AppError::NotFound(DECK_NOT_FOUND))?;

    tracing::info!(deck_id = %deck.id, "Updated deck");
    Ok(deck)
}

/// Deletes a deck together with all of its flashcards.
///
/// The flashcards go first, then the deck. The two steps are separate store
/// operations: if removing the flashcards fails, the deck is left untouched
/// and that error is returned as is. A flashcard created for this deck
/// between the two steps makes the deck delete fail with a store error.
///
/// Returns the number of flashcards removed.
#[tracing::instrument(skip(store))]
pub async fn delete_deck(store: &dyn Store, id: &str) -> Result<u64> {
    let id = parse_id(id, "deck")?;

    let removed_cards = store.delete_flashcards_by_deck(id).await?;

    if !store.delete_deck(id).await? {
        return Err(AppError::NotFound(DECK_NOT_FOUND));
    }

    tracing::info!(deck_id = %id, removed_cards, "Deleted deck and its flashcards");
    Ok(removed_cards)
}
