use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{Store, StoreError};
use crate::models::{
    CreateDeckData, CreateFlashcardData, Deck, Flashcard, UpdateDeckData, UpdateFlashcardData,
};

#[derive(Debug, Clone)]
struct DeckRow {
    id: Uuid,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Collections {
    // Both vectors are kept in insertion order, so reverse iteration is newest first.
    decks: Vec<DeckRow>,
    flashcards: Vec<Flashcard>,
}

impl Collections {
    fn card_count(&self, deck_id: Uuid) -> i64 {
        self.flashcards
            .iter()
            .filter(|card| card.deck_id == deck_id)
            .count() as i64
    }

    fn to_deck(&self, row: &DeckRow) -> Deck {
        Deck {
            id: row.id,
            name: row.name.clone(),
            description: row.description.clone(),
            card_count: self.card_count(row.id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// In-process store with the same integrity rules as the PostgreSQL schema:
/// a flashcard cannot reference a missing deck, and a deck with flashcards
/// cannot be deleted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_decks(&self) -> Result<Vec<Deck>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.decks.iter().rev().map(|row| inner.to_deck(row)).collect())
    }

    async fn find_deck(&self, id: Uuid) -> Result<Option<Deck>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .decks
            .iter()
            .find(|row| row.id == id)
            .map(|row| inner.to_deck(row)))
    }

    async fn deck_exists(&self, id: Uuid) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.decks.iter().any(|row| row.id == id))
    }

    async fn insert_deck(&self, data: CreateDeckData) -> Result<Deck, StoreError> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let row = DeckRow {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            created_at: now,
            updated_at: now,
        };
        let deck = inner.to_deck(&row);
        inner.decks.push(row);
        Ok(deck)
    }

    async fn update_deck(
        &self,
        id: Uuid,
        data: UpdateDeckData,
    ) -> Result<Option<Deck>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(row) = inner.decks.iter_mut().find(|row| row.id == id) else {
            return Ok(None);
        };

        row.name = data.name;
        row.description = data.description;
        row.updated_at = Utc::now();
        let row = row.clone();

        Ok(Some(inner.to_deck(&row)))
    }

    async fn delete_deck(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.card_count(id) > 0 {
            return Err(StoreError::Integrity(format!(
                "deck {} is still referenced by flashcards",
                id
            )));
        }

        let before = inner.decks.len();
        inner.decks.retain(|row| row.id != id);
        Ok(inner.decks.len() < before)
    }

    async fn list_flashcards_by_deck(&self, deck_id: Uuid) -> Result<Vec<Flashcard>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .flashcards
            .iter()
            .rev()
            .filter(|card| card.deck_id == deck_id)
            .cloned()
            .collect())
    }

    async fn find_flashcard(&self, id: Uuid) -> Result<Option<Flashcard>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.flashcards.iter().find(|card| card.id == id).cloned())
    }

    async fn insert_flashcard(&self, data: CreateFlashcardData) -> Result<Flashcard, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.decks.iter().any(|row| row.id == data.deck_id) {
            return Err(StoreError::Integrity(format!(
                "deck {} does not exist",
                data.deck_id
            )));
        }

        let now = Utc::now();
        let flashcard = Flashcard {
            id: Uuid::new_v4(),
            question: data.question,
            answer: data.answer,
            deck_id: data.deck_id,
            created_at: now,
            updated_at: now,
        };
        inner.flashcards.push(flashcard.clone());
        Ok(flashcard)
    }

    async fn update_flashcard(
        &self,
        id: Uuid,
        data: UpdateFlashcardData,
    ) -> Result<Option<Flashcard>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(card) = inner.flashcards.iter_mut().find(|card| card.id == id) else {
            return Ok(None);
        };

        card.question = data.question;
        card.answer = data.answer;
        card.updated_at = Utc::now();
        Ok(Some(card.clone()))
    }

    async fn delete_flashcard(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.flashcards.len();
        inner.flashcards.retain(|card| card.id != id);
        Ok(inner.flashcards.len() < before)
    }

    async fn delete_flashcards_by_deck(&self, deck_id: Uuid) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.flashcards.len();
        inner.flashcards.retain(|card| card.deck_id != deck_id);
        Ok((before - inner.flashcards.len()) as u64)
    }
}
