use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::modules::habits::core::habit::{HabitId, HabitRecord};
use crate::modules::habits::core::schedule::SlotTime;
use crate::modules::habits::use_cases::record_outcome::command::RecordOutcome;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct RecordOutcomeBody {
    pub success: bool,
    #[serde(default)]
    pub slot: Option<SlotTime>,
}

#[derive(Serialize)]
pub struct RecordOutcomeResponse {
    pub record_id: String,
    pub record: HabitRecord,
}

pub async fn handle(
    State(state): State<AppState>,
    Path(habit_id): Path<HabitId>,
    body: Result<Json<RecordOutcomeBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = RecordOutcome::new(
        state.habits.user_id(),
        habit_id,
        body.success,
        body.slot,
    );

    match state.record_outcome.handle(command).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(RecordOutcomeResponse {
                record_id: record.id.to_string(),
                record,
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod record_outcome_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::post,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::modules::habits::adapters::outbound::in_memory_store::StoreOperation;
    use crate::shell::state::AppState;
    use crate::tests::fixtures::app::TestApp;
    use crate::tests::fixtures::habits::HabitBuilder;

    use super::handle;

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/habits/{habit_id}/records", post(handle))
            .with_state(state)
    }

    fn post_record(habit_id: i64, body: &'static str) -> Request<Body> {
        Request::post(format!("/habits/{habit_id}/records"))
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn it_should_return_201_with_the_saved_record() {
        let test_app = TestApp::new();
        let habit_id = test_app
            .seed_habit(HabitBuilder::new(0).slots(&["09:00"]).draft())
            .await;

        let response = app(test_app.state.clone())
            .oneshot(post_record(habit_id, r#"{"success": true}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["record_id"], "1");
        assert_eq!(json["record"]["target_slot"], "09:00");
        assert_eq!(test_app.store.records().await.len(), 1);
    }

    #[tokio::test]
    async fn it_should_return_404_for_an_unknown_habit() {
        let test_app = TestApp::new();
        test_app.refresh().await;

        let response = app(test_app.state.clone())
            .oneshot(post_record(42, r#"{"success": true}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn it_should_return_409_when_the_slot_is_already_recorded() {
        let test_app = TestApp::new();
        let habit_id = test_app
            .seed_habit(HabitBuilder::new(0).slots(&["09:00"]).draft())
            .await;
        let router = app(test_app.state.clone());

        let first = router
            .clone()
            .oneshot(post_record(habit_id, r#"{"success": true, "slot": "09:00"}"#))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = router
            .oneshot(post_record(habit_id, r#"{"success": false, "slot": "09:00"}"#))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn it_should_return_502_and_roll_back_when_the_store_fails() {
        let test_app = TestApp::new();
        let habit_id = test_app.seed_habit(HabitBuilder::new(0).draft()).await;
        test_app.store.fail_on(StoreOperation::InsertRecord).await;

        let response = app(test_app.state.clone())
            .oneshot(post_record(habit_id, r#"{"success": true}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let board = test_app.state.habits.board();
        assert!(board.cards[0].habit.today_records.is_empty());
        assert_eq!(board.notices.len(), 1);
    }

    #[tokio::test]
    async fn it_should_return_422_when_the_body_is_invalid() {
        let test_app = TestApp::new();

        let response = app(test_app.state.clone())
            .oneshot(post_record(1, r#"{"success": "yes"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
