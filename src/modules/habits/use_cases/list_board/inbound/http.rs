use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::modules::habits::core::state::LoadStatus;
use crate::shell::state::AppState;

/// The evaluated board as of now. A failed load is served with 503 so clients
/// can show the retry path; the body still carries the failure message.
pub async fn handle(State(state): State<AppState>) -> impl IntoResponse {
    let board = state.habits.board();
    let status = match board.load_status {
        LoadStatus::Failed { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };
    (status, Json(board)).into_response()
}

/// Retry after a failed load.
pub async fn reload(State(state): State<AppState>) -> impl IntoResponse {
    let result = state.habits.refresh().await;
    let board = state.habits.board();
    match result {
        Ok(()) => Json(board).into_response(),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, Json(board)).into_response(),
    }
}

pub async fn dismiss_notice(
    State(state): State<AppState>,
    Path(notice_id): Path<u64>,
) -> impl IntoResponse {
    if state.habits.dismiss_notice(notice_id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
