use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::envelope::ApiResponse;
use crate::api::extract::ApiJson;
use crate::api::route_not_found;
use crate::api::state::AppState;
use crate::error::Result;
use crate::models::Deck;
use crate::services::decks;

/// Body of `POST /api/decks` and `PUT /api/decks/:id`.
/// Fields are optional here so a missing name is reported as a field error.
#[derive(Debug, Deserialize)]
pub struct DeckRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// GET /api/decks
async fn list_decks(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Deck>>>> {
    let decks = decks::list_decks(state.store()).await?;
    Ok(Json(ApiResponse::ok(decks)))
}

/// GET /api/decks/:id
async fn get_deck(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Deck>>> {
    let deck = decks::get_deck(state.store(), &id).await?;
    Ok(Json(ApiResponse::ok(deck)))
}

/// POST /api/decks
async fn create_deck(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DeckRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Deck>>)> {
    let deck = decks::create_deck(
        state.store(),
        request.name.as_deref(),
        request.description.as_deref(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(deck).with_message("Deck created successfully")),
    ))
}

/// PUT /api/decks/:id
async fn update_deck(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<DeckRequest>,
) -> Result<Json<ApiResponse<Deck>>> {
    let deck = decks::update_deck(
        state.store(),
        &id,
        request.name.as_deref(),
        request.description.as_deref(),
    )
    .await?;

    Ok(Json(
        ApiResponse::ok(deck).with_message("Deck updated successfully"),
    ))
}

/// DELETE /api/decks/:id
async fn delete_deck(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    decks::delete_deck(state.store(), &id).await?;

    Ok(Json(ApiResponse::done(
        "Deck and all its flashcards deleted successfully",
    )))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/decks",
            get(list_decks).post(create_deck).fallback(route_not_found),
        )
        .route(
            "/api/decks/:id",
            get(get_deck)
                .put(update_deck)
                .delete(delete_deck)
                .fallback(route_not_found),
        )
}
