use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::modules::habits::core::habit::{HabitDraft, HabitId};
use crate::modules::habits::core::schedule::{Schedule, SlotTime, WeekdaySet};
use crate::modules::habits::use_cases::manage_habit::command::ManageHabit;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct HabitBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub days: WeekdaySet,
    #[serde(default)]
    pub slots: Vec<SlotTime>,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}

impl From<HabitBody> for HabitDraft {
    fn from(body: HabitBody) -> Self {
        HabitDraft {
            name: body.name,
            description: body.description,
            schedule: Schedule::new(body.days, body.slots),
            active: body.active,
        }
    }
}

#[derive(Serialize)]
pub struct CreateHabitResponse {
    pub habit_id: Option<HabitId>,
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<HabitBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = ManageHabit::Create { draft: body.into() };
    match state.manage_habit.handle(command).await {
        Ok(habit_id) => (StatusCode::CREATED, Json(CreateHabitResponse { habit_id })).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(habit_id): Path<HabitId>,
    body: Result<Json<HabitBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = ManageHabit::Update {
        habit_id,
        draft: body.into(),
    };
    match state.manage_habit.handle(command).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(habit_id): Path<HabitId>,
) -> impl IntoResponse {
    match state
        .manage_habit
        .handle(ManageHabit::Delete { habit_id })
        .await
    {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
