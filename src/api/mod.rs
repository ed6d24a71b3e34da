// API module - HTTP endpoints

pub mod decks;
pub mod envelope;
pub mod extract;
pub mod flashcards;
pub mod health;
pub mod middleware;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub use state::AppState;

use crate::error::AppError;

/// Fallback for unknown paths and for methods a known path does not accept
pub(crate) async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found")
}

/// CORS restricted to the configured origin allow-list
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Builds the full application router
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route(
            "/api/health",
            get(health::health_check).fallback(route_not_found),
        )
        .merge(decks::router())
        .merge(flashcards::router())
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(middleware::panic::handle_panic))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::error_detail::expose_error_detail,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
