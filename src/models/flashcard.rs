use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub deck_id: Uuid, // immutable after creation
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateFlashcardData {
    pub question: String,
    pub answer: String,
    pub deck_id: Uuid,
}

/// Question/answer replacement; a card never moves between decks.
#[derive(Debug, Clone)]
pub struct UpdateFlashcardData {
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    /// Creates a new flashcard in an existing deck
    pub async fn create(pool: &PgPool, data: CreateFlashcardData) -> Result<Self, sqlx::Error> {
        let flashcard = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO flashcards (question, answer, deck_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&data.question)
        .bind(&data.answer)
        .bind(data.deck_id)
        .fetch_one(pool)
        .await?;

        Ok(flashcard)
    }

    /// Finds a flashcard by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let flashcard = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM flashcards WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(flashcard)
    }

    /// Lists the flashcards of a deck, newest first
    pub async fn list_by_deck(pool: &PgPool, deck_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let flashcards = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM flashcards
            WHERE deck_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(deck_id)
        .fetch_all(pool)
        .await?;

        Ok(flashcards)
    }

    /// Overwrites question and answer. Returns `None` if the card does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateFlashcardData,
    ) -> Result<Option<Self>, sqlx::Error> {
        let flashcard = sqlx::query_as::<_, Self>(
            r#"
            UPDATE flashcards
            SET question = $2, answer = $3, updated_at = clock_timestamp()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.question)
        .bind(&data.answer)
        .fetch_optional(pool)
        .await?;

        Ok(flashcard)
    }

    /// Deletes one flashcard. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM flashcards WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every flashcard of a deck. Returns the number removed.
    pub async fn delete_by_deck(pool: &PgPool, deck_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM flashcards WHERE deck_id = $1
            "#,
        )
        .bind(deck_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
