use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::api::envelope::ApiResponse;
use crate::api::state::AppState;
use crate::db::Store;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub timestamp: String,
    pub version: String,
    pub store: StoreHealth,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreHealth {
    pub backend: String,
    pub status: String,
    pub response_time_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Liveness probe.
///
/// Always answers 200 while the process is serving; the store check is
/// informational only.
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let store = check_store(state.store()).await;

    tracing::debug!(
        backend = %store.backend,
        status = %store.status,
        duration_ms = store.response_time_ms,
        "Health check completed"
    );

    let response = HealthResponse {
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store,
    };

    Json(ApiResponse::ok(response).with_message("Flashcard Study App API is running"))
}

async fn check_store(store: &dyn Store) -> StoreHealth {
    let start = Instant::now();

    match store.ping().await {
        Ok(()) => StoreHealth {
            backend: store.backend().to_string(),
            status: "healthy".to_string(),
            response_time_ms: start.elapsed().as_millis(),
            error: None,
        },
        Err(e) => StoreHealth {
            backend: store.backend().to_string(),
            status: "unhealthy".to_string(),
            response_time_ms: start.elapsed().as_millis(),
            error: Some(e.to_string()),
        },
    }
}
