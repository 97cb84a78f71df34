use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::modules::notifications::core::ports::PushError;
use crate::modules::notifications::core::subscription::{Permission, PushSubscription};
use crate::modules::notifications::use_cases::toggle_push::handler::{EnablePush, PushFailure};
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct EnablePushBody {
    pub permission: Permission,
    #[serde(default)]
    pub subscription: Option<PushSubscription>,
}

fn status_code(error: &PushError) -> StatusCode {
    match error {
        PushError::Misconfigured => StatusCode::SERVICE_UNAVAILABLE,
        PushError::PermissionDenied => StatusCode::FORBIDDEN,
        PushError::Unsupported | PushError::InvalidSubscription(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PushError::Busy => StatusCode::CONFLICT,
        PushError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        PushError::Registry(_) => StatusCode::BAD_GATEWAY,
    }
}

fn failure_response(failure: PushFailure) -> axum::response::Response {
    let body = json!({
        "error": failure.error.to_string(),
        "status": failure.status,
    });
    (status_code(&failure.error), Json(body)).into_response()
}

pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.toggle_push.status().await)
}

pub async fn enable(
    State(state): State<AppState>,
    body: Result<Json<EnablePushBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = EnablePush {
        permission: body.permission,
        subscription: body.subscription,
    };
    match state.toggle_push.enable(command).await {
        Ok(status) => Json(status).into_response(),
        Err(failure) => failure_response(failure),
    }
}

pub async fn disable(State(state): State<AppState>) -> impl IntoResponse {
    match state.toggle_push.disable().await {
        Ok(status) => Json(status).into_response(),
        Err(failure) => failure_response(failure),
    }
}
