use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use flashdeck::api::{app, AppState};
use flashdeck::config::{AppEnv, Config, StoreKind};
use flashdeck::db::{MemoryStore, Store, StoreError};
use flashdeck::models::{
    CreateDeckData, CreateFlashcardData, Deck, Flashcard, UpdateDeckData, UpdateFlashcardData,
};

fn test_config(app_env: AppEnv) -> Config {
    Config {
        app_env,
        store: StoreKind::Memory,
        ..Config::default()
    }
}

fn test_app() -> Router {
    app(AppState::new(
        Arc::new(MemoryStore::new()),
        test_config(AppEnv::Test),
    ))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn create_deck(app: &Router, name: &str) -> String {
    let (status, body) = send(app, "POST", "/api/decks", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["_id"].as_str().unwrap().to_string()
}

async fn create_card(app: &Router, deck_id: &str, question: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/flashcards",
        Some(json!({ "question": question, "answer": "answer", "deckId": deck_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_spanish_deck_lifecycle() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/decks",
        Some(json!({ "name": "Spanish", "description": "Basics" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Deck created successfully");
    assert_eq!(body["data"]["name"], "Spanish");
    assert_eq!(body["data"]["description"], "Basics");
    assert_eq!(body["data"]["cardCount"], 0);
    let deck_id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/flashcards",
        Some(json!({ "question": "hola", "answer": "hello", "deckId": deck_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["deckId"], deck_id.as_str());

    let (status, body) = send(&app, "GET", &format!("/api/decks/{}", deck_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cardCount"], 1);

    let (status, body) = send(&app, "DELETE", &format!("/api/decks/{}", deck_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Deck and all its flashcards deleted successfully" })
    );

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/flashcards/deck/{}", deck_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "message": "Deck not found" }));
}

#[tokio::test]
async fn test_list_decks_newest_first_with_counts() {
    let app = test_app();
    let older = create_deck(&app, "older").await;
    let newer = create_deck(&app, "newer").await;
    create_card(&app, &older, "q").await;

    let (status, body) = send(&app, "GET", "/api/decks", None).await;
    assert_eq!(status, StatusCode::OK);

    let decks = body["data"].as_array().unwrap();
    assert_eq!(decks.len(), 2);
    assert_eq!(decks[0]["_id"], newer.as_str());
    assert_eq!(decks[0]["cardCount"], 0);
    assert_eq!(decks[1]["_id"], older.as_str());
    assert_eq!(decks[1]["cardCount"], 1);
}

#[tokio::test]
async fn test_create_deck_validation_errors() {
    let app = test_app();

    let (status, body) = send(&app, "POST", "/api/decks", Some(json!({ "name": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"][0]["path"], "name");
    assert_eq!(body["errors"][0]["msg"], "Deck name is required");

    let (status, body) = send(
        &app,
        "POST",
        "/api/decks",
        Some(json!({ "name": "ok", "description": "d".repeat(501) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["path"], "description");

    let (_, body) = send(&app, "GET", "/api/decks", None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_update_deck() {
    let app = test_app();
    let deck_id = create_deck(&app, "Old").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/decks/{}", deck_id),
        Some(json!({ "name": " New name ", "description": "Fresh" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deck updated successfully");
    assert_eq!(body["data"]["_id"], deck_id.as_str());
    assert_eq!(body["data"]["name"], "New name");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/decks/{}", Uuid::new_v4()),
        Some(json!({ "name": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_identifiers_and_bodies() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/api/decks/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid deck ID");

    let (status, body) = send(&app, "DELETE", "/api/flashcards/42", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid flashcard ID");

    let request = Request::builder()
        .method("POST")
        .uri("/api/decks")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "success": false, "message": "Invalid request body" }));
}

#[tokio::test]
async fn test_create_flashcard_errors() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/flashcards",
        Some(json!({ "question": "q", "answer": "a", "deckId": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Deck not found");

    let (status, body) = send(
        &app,
        "POST",
        "/api/flashcards",
        Some(json!({ "question": "", "answer": "a", "deckId": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["question", "deckId"]);
}

#[tokio::test]
async fn test_question_length_boundary() {
    let app = test_app();
    let deck_id = create_deck(&app, "Long").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/flashcards",
        Some(json!({ "question": "q".repeat(1000), "answer": "a", "deckId": deck_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/flashcards",
        Some(json!({ "question": "q".repeat(1001), "answer": "a", "deckId": deck_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["msg"], "Question cannot exceed 1000 characters");
}

#[tokio::test]
async fn test_flashcard_crud() {
    let app = test_app();
    let deck_id = create_deck(&app, "Capitals").await;
    let c1 = create_card(&app, &deck_id, "C1").await;
    let c2 = create_card(&app, &deck_id, "C2").await;
    let c3 = create_card(&app, &deck_id, "C3").await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/flashcards/deck/{}", deck_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![c3.as_str(), c2.as_str(), c1.as_str()]);

    let other_deck = create_deck(&app, "Other").await;
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/flashcards/{}", c1),
        Some(json!({ "question": "Capital of France?", "answer": "Paris", "deckId": other_deck })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Flashcard updated successfully");
    assert_eq!(body["data"]["answer"], "Paris");
    assert_eq!(body["data"]["deckId"], deck_id.as_str());

    let (status, body) = send(&app, "GET", &format!("/api/flashcards/{}", c1), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["question"], "Capital of France?");

    let (status, body) = send(&app, "DELETE", &format!("/api/flashcards/{}", c2), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Flashcard deleted successfully");

    let (status, body) = send(&app, "DELETE", &format!("/api/flashcards/{}", c2), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Flashcard not found");
}

#[tokio::test]
async fn test_health_and_unknown_routes() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["store"]["backend"], "memory");
    assert_eq!(body["data"]["store"]["status"], "healthy");

    let (status, body) = send(&app, "GET", "/api/nothing-here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "message": "Route not found" }));
}

#[tokio::test]
async fn test_cors_allow_list() {
    let app = test_app();

    let preflight = |origin: &'static str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/decks")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    };

    let response = app
        .clone()
        .oneshot(preflight("http://localhost:3000"))
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );

    let response = app
        .clone()
        .oneshot(preflight("https://evil.example.com"))
        .await
        .unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

/// Store whose every operation fails like an unreachable database
struct UnavailableStore;

fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl Store for UnavailableStore {
    fn backend(&self) -> &'static str {
        "unavailable"
    }
    async fn ping(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }
    async fn list_decks(&self) -> Result<Vec<Deck>, StoreError> {
        Err(unavailable())
    }
    async fn find_deck(&self, _id: Uuid) -> Result<Option<Deck>, StoreError> {
        Err(unavailable())
    }
    async fn deck_exists(&self, _id: Uuid) -> Result<bool, StoreError> {
        Err(unavailable())
    }
    async fn insert_deck(&self, _data: CreateDeckData) -> Result<Deck, StoreError> {
        Err(unavailable())
    }
    async fn update_deck(
        &self,
        _id: Uuid,
        _data: UpdateDeckData,
    ) -> Result<Option<Deck>, StoreError> {
        Err(unavailable())
    }
    async fn delete_deck(&self, _id: Uuid) -> Result<bool, StoreError> {
        Err(unavailable())
    }
    async fn list_flashcards_by_deck(&self, _deck_id: Uuid) -> Result<Vec<Flashcard>, StoreError> {
        Err(unavailable())
    }
    async fn find_flashcard(&self, _id: Uuid) -> Result<Option<Flashcard>, StoreError> {
        Err(unavailable())
    }
    async fn insert_flashcard(&self, _data: CreateFlashcardData) -> Result<Flashcard, StoreError> {
        Err(unavailable())
    }
    async fn update_flashcard(
        &self,
        _id: Uuid,
        _data: UpdateFlashcardData,
    ) -> Result<Option<Flashcard>, StoreError> {
        Err(unavailable())
    }
    async fn delete_flashcard(&self, _id: Uuid) -> Result<bool, StoreError> {
        Err(unavailable())
    }
    async fn delete_flashcards_by_deck(&self, _deck_id: Uuid) -> Result<u64, StoreError> {
        Err(unavailable())
    }
}

#[tokio::test]
async fn test_internal_errors_hide_detail_outside_development() {
    let production = app(AppState::new(
        Arc::new(UnavailableStore),
        test_config(AppEnv::Production),
    ));
    let (status, body) = send(&production, "GET", "/api/decks", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "message": "Internal server error" }));

    let development = app(AppState::new(
        Arc::new(UnavailableStore),
        test_config(AppEnv::Development),
    ));
    let (status, body) = send(&development, "GET", "/api/decks", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
    assert!(body["error"].as_str().unwrap().contains("pool timed out"));

    // Liveness stays up even when the store is not
    let (status, body) = send(&development, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["store"]["status"], "unhealthy");
}

#[tokio::test]
async fn test_unsupported_methods_get_route_not_found_envelope() {
    let app = test_app();
    let deck_id = create_deck(&app, "Spanish").await;
    let not_found = json!({ "success": false, "message": "Route not found" });

    let cases = [
        ("PATCH", "/api/decks".to_string()),
        ("POST", format!("/api/decks/{}", deck_id)),
        ("DELETE", "/api/health".to_string()),
        ("GET", "/api/flashcards".to_string()),
        ("PUT", format!("/api/flashcards/deck/{}", deck_id)),
        ("POST", format!("/api/flashcards/{}", Uuid::new_v4())),
    ];

    for (method, uri) in cases {
        let (status, body) = send(&app, method, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(body, not_found, "{} {}", method, uri);
    }

    // The deck is untouched by the rejected request
    let (status, body) = send(&app, "GET", &format!("/api/decks/{}", deck_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Spanish");
}

#[tokio::test]
async fn test_wrongly_typed_field_is_invalid_body() {
    let app = test_app();

    let (status, body) = send(&app, "POST", "/api/decks", Some(json!({ "name": 123 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "message": "Invalid request body" }));

    let (_, body) = send(&app, "GET", "/api/decks", None).await;
    assert_eq!(body["data"], json!([]));
}
