//! `PgStore` against a real PostgreSQL database.
//!
//! `#[sqlx::test]` creates a fresh database per test from `DATABASE_URL` and
//! applies `migrations/`. Run with `cargo test -- --ignored` when a server is
//! available.

use sqlx::PgPool;
use uuid::Uuid;

use flashdeck::db::{PgStore, Store, StoreError};
use flashdeck::error::AppError;
use flashdeck::models::{CreateDeckData, CreateFlashcardData, UpdateDeckData};
use flashdeck::services::{decks, flashcards};

async fn insert_deck(store: &PgStore, name: &str) -> Uuid {
    store
        .insert_deck(CreateDeckData {
            name: name.to_string(),
            description: String::new(),
        })
        .await
        .unwrap()
        .id
}

async fn insert_card(store: &PgStore, deck_id: Uuid, question: &str) -> Uuid {
    store
        .insert_flashcard(CreateFlashcardData {
            question: question.to_string(),
            answer: "answer".to_string(),
            deck_id,
        })
        .await
        .unwrap()
        .id
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_list_decks_newest_first_with_counts(pool: PgPool) {
    let store = PgStore::new(pool);
    let older = insert_deck(&store, "older").await;
    let newer = insert_deck(&store, "newer").await;
    insert_card(&store, older, "q1").await;
    insert_card(&store, older, "q2").await;

    let decks = store.list_decks().await.unwrap();

    assert_eq!(decks.len(), 2);
    assert_eq!(decks[0].id, newer);
    assert_eq!(decks[0].card_count, 0);
    assert_eq!(decks[1].id, older);
    assert_eq!(decks[1].card_count, 2);

    let found = store.find_deck(older).await.unwrap().unwrap();
    assert_eq!(found.card_count, 2);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_equal_timestamps_order_by_id(pool: PgPool) {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    sqlx::query(
        r#"
        INSERT INTO decks (id, name, created_at, updated_at)
        VALUES ($1, 'a', '2024-06-01T10:00:00Z', '2024-06-01T10:00:00Z'),
               ($2, 'b', '2024-06-01T10:00:00Z', '2024-06-01T10:00:00Z')
        "#,
    )
    .bind(a)
    .bind(b)
    .execute(&pool)
    .await
    .unwrap();

    let store = PgStore::new(pool);
    let ids: Vec<Uuid> = store
        .list_decks()
        .await
        .unwrap()
        .into_iter()
        .map(|deck| deck.id)
        .collect();

    assert_eq!(ids, vec![a.max(b), a.min(b)]);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_list_flashcards_newest_first(pool: PgPool) {
    let store = PgStore::new(pool);
    let deck_id = insert_deck(&store, "Capitals").await;
    let c1 = insert_card(&store, deck_id, "C1").await;
    let c2 = insert_card(&store, deck_id, "C2").await;
    let c3 = insert_card(&store, deck_id, "C3").await;

    let ids: Vec<Uuid> = flashcards::list_flashcards_by_deck(&store, &deck_id.to_string())
        .await
        .unwrap()
        .into_iter()
        .map(|card| card.id)
        .collect();

    assert_eq!(ids, vec![c3, c2, c1]);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_update_deck_returns_count_and_bumps_updated_at(pool: PgPool) {
    let store = PgStore::new(pool);
    let deck_id = insert_deck(&store, "Old").await;
    insert_card(&store, deck_id, "q").await;
    let before = store.find_deck(deck_id).await.unwrap().unwrap();

    let updated = store
        .update_deck(
            deck_id,
            UpdateDeckData {
                name: "New".to_string(),
                description: "Fresh".to_string(),
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "New");
    assert_eq!(updated.card_count, 1);
    assert_eq!(updated.created_at, before.created_at);
    assert!(updated.updated_at > before.updated_at);

    let missing = store
        .update_deck(
            Uuid::new_v4(),
            UpdateDeckData {
                name: "x".to_string(),
                description: String::new(),
            },
        )
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_cascade_delete_removes_cards(pool: PgPool) {
    let store = PgStore::new(pool);
    let deck_id = insert_deck(&store, "Spanish").await;
    let card = insert_card(&store, deck_id, "hola").await;
    insert_card(&store, deck_id, "adiós").await;

    let removed = decks::delete_deck(&store, &deck_id.to_string())
        .await
        .unwrap();

    assert_eq!(removed, 2);
    assert!(store.find_flashcard(card).await.unwrap().is_none());
    assert!(matches!(
        decks::get_deck(&store, &deck_id.to_string()).await,
        Err(AppError::NotFound("Deck not found"))
    ));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_foreign_key_guards_decks_and_cards(pool: PgPool) {
    let store = PgStore::new(pool);
    let deck_id = insert_deck(&store, "Spanish").await;
    insert_card(&store, deck_id, "hola").await;

    // A card created after the bulk delete keeps the deck row in place
    let err = store.delete_deck(deck_id).await.unwrap_err();
    assert!(matches!(err, StoreError::Database(_)));
    assert!(store.deck_exists(deck_id).await.unwrap());

    let err = store
        .insert_flashcard(CreateFlashcardData {
            question: "q".to_string(),
            answer: "a".to_string(),
            deck_id: Uuid::new_v4(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Database(_)));
}
