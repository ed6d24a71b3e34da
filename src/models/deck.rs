use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A named collection of flashcards.
///
/// `card_count` is not a column: every query below computes it from the
/// `flashcards` table at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub card_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, trimmed input for a new deck
#[derive(Debug, Clone)]
pub struct CreateDeckData {
    pub name: String,
    pub description: String,
}

/// Validated, trimmed replacement values for an existing deck
#[derive(Debug, Clone)]
pub struct UpdateDeckData {
    pub name: String,
    pub description: String,
}

impl Deck {
    /// Creates a new deck
    pub async fn create(pool: &PgPool, data: CreateDeckData) -> Result<Self, sqlx::Error> {
        let deck = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO decks (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at,
                      0::BIGINT AS card_count
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(pool)
        .await?;

        Ok(deck)
    }

    /// Finds a deck by ID, with its current card count
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let deck = sqlx::query_as::<_, Self>(
            r#"
            SELECT d.id, d.name, d.description, d.created_at, d.updated_at,
                   (SELECT COUNT(*) FROM flashcards f WHERE f.deck_id = d.id) AS card_count
            FROM decks d
            WHERE d.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(deck)
    }

    /// Lists all decks, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let decks = sqlx::query_as::<_, Self>(
            r#"
            SELECT d.id, d.name, d.description, d.created_at, d.updated_at,
                   (SELECT COUNT(*) FROM flashcards f WHERE f.deck_id = d.id) AS card_count
            FROM decks d
            ORDER BY d.created_at DESC, d.id DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(decks)
    }

    /// Overwrites name and description. Returns `None` if the deck does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateDeckData,
    ) -> Result<Option<Self>, sqlx::Error> {
        let deck = sqlx::query_as::<_, Self>(
            r#"
            UPDATE decks
            SET name = $2, description = $3, updated_at = clock_timestamp()
            WHERE id = $1
            RETURNING id, name, description, created_at, updated_at,
                      (SELECT COUNT(*) FROM flashcards f WHERE f.deck_id = decks.id) AS card_count
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .fetch_optional(pool)
        .await?;

        Ok(deck)
    }

    /// Deletes the deck row only. Returns whether a row was removed.
    ///
    /// Callers must remove the deck's flashcards first; the foreign key on
    /// `flashcards.deck_id` rejects the delete otherwise.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM decks WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether a deck exists without computing its card count
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM decks WHERE id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }
}
