// Push registry backed by the hosted `pushSub` table.
//
// One row per user. Enabling upserts the browser subscription as `sub_data`;
// disabling only flips `active`, keeping the row for later re-enabling.

use crate::modules::notifications::core::ports::{PushError, PushRegistry};
use crate::modules::notifications::core::subscription::PushSubscription;
use crate::shared::infrastructure::rest_client::{RestClient, RestError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

const PUSH_SUB_PATH: &str = "rest/v1/pushSub";
const UPSERT_PREFERENCE: &str = "resolution=merge-duplicates";

#[derive(Debug, Deserialize)]
struct ActiveRow {
    active: bool,
}

pub struct RestPushRegistry {
    client: RestClient,
}

impl RestPushRegistry {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

pub fn upsert_body(user_id: &str, subscription: &PushSubscription) -> Value {
    json!({
        "user_id": user_id,
        "sub_data": subscription,
        "active": true,
    })
}

impl From<RestError> for PushError {
    fn from(err: RestError) -> Self {
        PushError::Registry(err.to_string())
    }
}

fn user_filter(user_id: &str) -> [(&'static str, String); 1] {
    [("user_id", format!("eq.{user_id}"))]
}

#[async_trait]
impl PushRegistry for RestPushRegistry {
    async fn register(
        &self,
        user_id: &str,
        subscription: &PushSubscription,
    ) -> Result<(), PushError> {
        self.client
            .post_json(
                PUSH_SUB_PATH,
                &upsert_body(user_id, subscription),
                Some(UPSERT_PREFERENCE),
            )
            .await?;
        Ok(())
    }

    async fn deactivate(&self, user_id: &str) -> Result<(), PushError> {
        self.client
            .patch(PUSH_SUB_PATH, &user_filter(user_id), &json!({ "active": false }))
            .await?;
        Ok(())
    }

    async fn is_active(&self, user_id: &str) -> Result<bool, PushError> {
        let mut query = user_filter(user_id).to_vec();
        query.push(("select", "active".to_string()));
        let rows: Vec<ActiveRow> = self.client.get_json(PUSH_SUB_PATH, &query).await?;
        Ok(rows.iter().any(|r| r.active))
    }
}
