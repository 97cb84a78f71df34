// Thin HTTP client for the hosted backend (PostgREST tables and edge functions).
//
// Responsibilities
// - Attach the api key and the user's bearer token to every request.
// - Bound every request with the configured timeout.
// - Turn transport failures, non-2xx responses and undecodable bodies into RestError.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RestError {
    #[error("request timed out")]
    Timeout,

    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RestError::Timeout
        } else if err.is_decode() {
            RestError::Decode(err.to_string())
        } else {
            RestError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct RestConfig {
    pub base_url: String,
    pub api_key: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    config: RestConfig,
}

pub type Query<'a> = &'a [(&'a str, String)];

impl RestClient {
    pub fn new(config: RestConfig) -> Result<Self, RestError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, query: Query<'_>) -> RequestBuilder {
        let token = self
            .config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.api_key);
        self.http
            .request(method, self.url(path))
            .query(query)
            .header("apikey", &self.config.api_key)
            .bearer_auth(token)
    }

    async fn check(response: Response) -> Result<Response, RestError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RestError::Status {
            status: status.as_u16(),
            body,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
    ) -> Result<T, RestError> {
        let response = self.request(Method::GET, path, query).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// POST that asks the server to echo the written rows back.
    pub async fn insert_returning<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, RestError> {
        let response = self
            .request(Method::POST, path, &[])
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
        prefer: Option<&str>,
    ) -> Result<serde_json::Value, RestError> {
        let mut request = self.request(Method::POST, path, &[]).json(body);
        if let Some(prefer) = prefer {
            request = request.header("Prefer", prefer);
        }
        let response = Self::check(request.send().await?).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
    }

    pub async fn patch(
        &self,
        path: &str,
        query: Query<'_>,
        body: &serde_json::Value,
    ) -> Result<(), RestError> {
        let response = self
            .request(Method::PATCH, path, query)
            .json(body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str, query: Query<'_>) -> Result<(), RestError> {
        let response = self.request(Method::DELETE, path, query).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// DELETE that echoes the removed rows back, for callers that need a count.
    pub async fn delete_returning<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
    ) -> Result<T, RestError> {
        let response = self
            .request(Method::DELETE, path, query)
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }
}
