use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::modules::habits::core::habit::RecordId;
use crate::modules::habits::use_cases::undo_record::command::UndoRecord;
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> impl IntoResponse {
    let record_id = match raw_id.parse::<RecordId>() {
        Ok(id) => id,
        Err(reason) => {
            let body = json!({ "error": format!("invalid record id {raw_id}: {reason}") });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    match state.undo_record.handle(UndoRecord { record_id }).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
