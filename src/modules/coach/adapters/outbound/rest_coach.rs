// Coach client backed by the hosted `create-response` edge function.

use crate::modules::coach::core::ports::{CoachClient, CoachError};
use crate::shared::infrastructure::rest_client::{RestClient, RestError};
use async_trait::async_trait;
use serde_json::{Value, json};

const CREATE_RESPONSE_PATH: &str = "functions/v1/create-response";

pub struct RestCoachClient {
    client: RestClient,
}

impl RestCoachClient {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

pub fn request_body(user_input: &str) -> Value {
    json!({ "userInput": user_input })
}

impl From<RestError> for CoachError {
    fn from(err: RestError) -> Self {
        CoachError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl CoachClient for RestCoachClient {
    async fn ask(&self, user_input: &str) -> Result<Value, CoachError> {
        Ok(self
            .client
            .post_json(CREATE_RESPONSE_PATH, &request_body(user_input), None)
            .await?)
    }
}
