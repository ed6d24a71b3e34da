use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    CreateDeckData, CreateFlashcardData, Deck, Flashcard, UpdateDeckData, UpdateFlashcardData,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Integrity violation: {0}")]
    Integrity(String),
}

/// Persistence for decks and the flashcards they own.
///
/// Each method is a single store operation. Multi-step rules (existence
/// checks, the deck cascade) belong to the services, not to implementors.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name reported by the health endpoint
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;

    // Decks
    async fn list_decks(&self) -> Result<Vec<Deck>, StoreError>;
    async fn find_deck(&self, id: Uuid) -> Result<Option<Deck>, StoreError>;
    async fn deck_exists(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn insert_deck(&self, data: CreateDeckData) -> Result<Deck, StoreError>;
    async fn update_deck(&self, id: Uuid, data: UpdateDeckData)
        -> Result<Option<Deck>, StoreError>;
    async fn delete_deck(&self, id: Uuid) -> Result<bool, StoreError>;

    // Flashcards
    async fn list_flashcards_by_deck(&self, deck_id: Uuid) -> Result<Vec<Flashcard>, StoreError>;
    async fn find_flashcard(&self, id: Uuid) -> Result<Option<Flashcard>, StoreError>;
    async fn insert_flashcard(&self, data: CreateFlashcardData) -> Result<Flashcard, StoreError>;
    async fn update_flashcard(
        &self,
        id: Uuid,
        data: UpdateFlashcardData,
    ) -> Result<Option<Flashcard>, StoreError>;
    async fn delete_flashcard(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn delete_flashcards_by_deck(&self, deck_id: Uuid) -> Result<u64, StoreError>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn list_decks(&self) -> Result<Vec<Deck>, StoreError> {
        Ok(Deck::list_all(&self.pool).await?)
    }

    async fn find_deck(&self, id: Uuid) -> Result<Option<Deck>, StoreError> {
        Ok(Deck::find_by_id(&self.pool, id).await?)
    }

    async fn deck_exists(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(Deck::exists(&self.pool, id).await?)
    }

    async fn insert_deck(&self, data: CreateDeckData) -> Result<Deck, StoreError> {
        Ok(Deck::create(&self.pool, data).await?)
    }

    async fn update_deck(
        &self,
        id: Uuid,
        data: UpdateDeckData,
    ) -> Result<Option<Deck>, StoreError> {
        Ok(Deck::update(&self.pool, id, data).await?)
    }

    async fn delete_deck(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(Deck::delete(&self.pool, id).await?)
    }

    async fn list_flashcards_by_deck(&self, deck_id: Uuid) -> Result<Vec<Flashcard>, StoreError> {
        Ok(Flashcard::list_by_deck(&self.pool, deck_id).await?)
    }

    async fn find_flashcard(&self, id: Uuid) -> Result<Option<Flashcard>, StoreError> {
        Ok(Flashcard::find_by_id(&self.pool, id).await?)
    }

    async fn insert_flashcard(&self, data: CreateFlashcardData) -> Result<Flashcard, StoreError> {
        Ok(Flashcard::create(&self.pool, data).await?)
    }

    async fn update_flashcard(
        &self,
        id: Uuid,
        data: UpdateFlashcardData,
    ) -> Result<Option<Flashcard>, StoreError> {
        Ok(Flashcard::update(&self.pool, id, data).await?)
    }

    async fn delete_flashcard(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(Flashcard::delete(&self.pool, id).await?)
    }

    async fn delete_flashcards_by_deck(&self, deck_id: Uuid) -> Result<u64, StoreError> {
        Ok(Flashcard::delete_by_deck(&self.pool, deck_id).await?)
    }
}
