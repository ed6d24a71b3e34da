use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::api::envelope::ApiResponse;
use crate::api::extract::ApiJson;
use crate::api::route_not_found;
use crate::api::state::AppState;
use crate::error::Result;
use crate::models::Flashcard;
use crate::services::flashcards;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlashcardRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub deck_id: Option<String>,
}

/// Update body. A `deckId` sent by the client is ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateFlashcardRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
}

/// GET /api/flashcards/deck/:deck_id
async fn list_by_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Flashcard>>>> {
    let cards = flashcards::list_flashcards_by_deck(state.store(), &deck_id).await?;
    Ok(Json(ApiResponse::ok(cards)))
}

/// GET /api/flashcards/:id
async fn get_flashcard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Flashcard>>> {
    let card = flashcards::get_flashcard(state.store(), &id).await?;
    Ok(Json(ApiResponse::ok(card)))
}

/// POST /api/flashcards
async fn create_flashcard(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateFlashcardRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Flashcard>>)> {
    let card = flashcards::create_flashcard(
        state.store(),
        request.question.as_deref(),
        request.answer.as_deref(),
        request.deck_id.as_deref(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(card).with_message("Flashcard created successfully")),
    ))
}

/// PUT /api/flashcards/:id
async fn update_flashcard(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateFlashcardRequest>,
) -> Result<Json<ApiResponse<Flashcard>>> {
    let card = flashcards::update_flashcard(
        state.store(),
        &id,
        request.question.as_deref(),
        request.answer.as_deref(),
    )
    .await?;

    Ok(Json(
        ApiResponse::ok(card).with_message("Flashcard updated successfully"),
    ))
}

/// DELETE /api/flashcards/:id
async fn delete_flashcard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    flashcards::delete_flashcard(state.store(), &id).await?;
    Ok(Json(ApiResponse::done("Flashcard deleted successfully")))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/flashcards",
            post(create_flashcard).fallback(route_not_found),
        )
        .route(
            "/api/flashcards/deck/:deck_id",
            get(list_by_deck).fallback(route_not_found),
        )
        .route(
            "/api/flashcards/:id",
            get(get_flashcard)
                .put(update_flashcard)
                .delete(delete_flashcard)
                .fallback(route_not_found),
        )
}
