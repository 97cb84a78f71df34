use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::modules::coach::use_cases::send_message::handler::SendMessageError;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct SendMessageBody {
    pub text: String,
}

pub async fn list(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.send_message.transcript().await)
}

pub async fn send(
    State(state): State<AppState>,
    body: Result<Json<SendMessageBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    match state.send_message.handle(&body.text).await {
        Ok(reply) => Json(reply).into_response(),
        Err(err) => {
            let status = match err {
                SendMessageError::EmptyMessage => StatusCode::UNPROCESSABLE_ENTITY,
                SendMessageError::Busy => StatusCode::CONFLICT,
            };
            (status, Json(json!({ "error": err.to_string() }))).into_response()
        }
    }
}
