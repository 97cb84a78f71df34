use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::modules::coach::use_cases::send_message::inbound::http as coach_http;
use crate::modules::habits::use_cases::habit_history::inbound::http as history_http;
use crate::modules::habits::use_cases::list_board::inbound::http as board_http;
use crate::modules::habits::use_cases::manage_habit::inbound::http as manage_http;
use crate::modules::habits::use_cases::record_outcome::inbound::http as record_http;
use crate::modules::habits::use_cases::select_habit::inbound::http as select_http;
use crate::modules::habits::use_cases::undo_record::inbound::http as undo_http;
use crate::modules::notifications::use_cases::toggle_push::inbound::http as push_http;
use crate::shared::infrastructure::change_feed::ChangeEvent;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/habits", get(board_http::handle).post(manage_http::create))
        .route("/habits/reload", post(board_http::reload))
        .route(
            "/habits/{habit_id}",
            put(manage_http::update).delete(manage_http::delete),
        )
        .route("/habits/{habit_id}/records", post(record_http::handle))
        .route("/habits/{habit_id}/history", get(history_http::handle))
        .route("/records/{record_id}", delete(undo_http::handle))
        .route("/selection", put(select_http::select))
        .route("/editing", put(select_http::edit))
        .route("/notices/{notice_id}", delete(board_http::dismiss_notice))
        .route("/coach/messages", get(coach_http::list).post(coach_http::send))
        .route("/push", get(push_http::status))
        .route("/push/enable", post(push_http::enable))
        .route("/push/disable", post(push_http::disable))
        .route("/changes", post(receive_change))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Store change webhook. The event only says which table changed; the change
/// worker decides whether to re-fetch.
async fn receive_change(
    State(state): State<AppState>,
    body: Result<Json<ChangeEvent>, JsonRejection>,
) -> impl IntoResponse {
    let Json(event) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY,
    };
    state.changes.publish(event);
    StatusCode::ACCEPTED
}
