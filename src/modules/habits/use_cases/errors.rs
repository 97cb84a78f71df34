use crate::modules::habits::core::decision::DecideError;
use crate::modules::habits::core::ports::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("domain rejected: {0}")]
    Domain(#[from] DecideError),

    #[error("habits are not loaded: {0}")]
    NotLoaded(String),
}

impl ApplicationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApplicationError::Domain(DecideError::HabitNotFound(_))
            | ApplicationError::Domain(DecideError::RecordNotFound(_))
            | ApplicationError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApplicationError::Domain(DecideError::EmptyName) => StatusCode::UNPROCESSABLE_ENTITY,
            ApplicationError::Domain(_) => StatusCode::CONFLICT,
            ApplicationError::Store(StoreError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApplicationError::Store(_) => StatusCode::BAD_GATEWAY,
            ApplicationError::NotLoaded(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}
