use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::envelope::{ApiResponse, ErrorDetail};
use crate::api::state::AppState;

/// Adds the internal error detail to 500 envelopes when running in development.
///
/// `AppError` attaches the detail as an `ErrorDetail` response extension;
/// outside development the extension is simply dropped with the response.
pub async fn expose_error_detail(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if !state.config.app_env.is_development() {
        return response;
    }

    let Some(ErrorDetail(detail)) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    let body = ApiResponse::<()>::failure("Internal server error").with_error_detail(detail);
    (response.status(), Json(body)).into_response()
}
