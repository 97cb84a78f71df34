use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::modules::habits::core::habit::HabitId;
use crate::modules::habits::use_cases::select_habit::decide::{ChangeFocus, Focus};
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct FocusBody {
    pub habit_id: Option<HabitId>,
}

async fn change_focus(
    state: AppState,
    focus: Focus,
    body: Result<Json<FocusBody>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = ChangeFocus {
        focus,
        habit_id: body.habit_id,
    };
    match state.select_habit.handle(command).await {
        Ok(()) => Json(state.habits.board()).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Opens a habit's detail view, or closes it with `{"habit_id": null}`.
pub async fn select(
    State(state): State<AppState>,
    body: Result<Json<FocusBody>, JsonRejection>,
) -> impl IntoResponse {
    change_focus(state, Focus::Selected, body).await
}

pub async fn edit(
    State(state): State<AppState>,
    body: Result<Json<FocusBody>, JsonRejection>,
) -> impl IntoResponse {
    change_focus(state, Focus::Editing, body).await
}
