use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::modules::habits::core::habit::HabitId;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
}

pub async fn handle(
    State(state): State<AppState>,
    Path(habit_id): Path<HabitId>,
    Query(params): Query<HistoryParams>,
) -> impl IntoResponse {
    match state.habit_history.handle(habit_id, params.limit).await {
        Ok(entries) => Json(entries).into_response(),
        Err(err) => err.into_response(),
    }
}
