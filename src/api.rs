//! Client side of the habit-storage HTTP API.

use crate::config::Config;
use crate::dates::DateKey;
use crate::errors::{ClientError, Result};
use crate::models::{
    ApiErrorBody, CompleteHabitRequest, Completion, CreateHabitRequest, Habit, Statistics,
    UpdateHabitRequest,
};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Operations offered by the habit-storage API.
#[async_trait]
pub trait HabitApi: Send + Sync {
    async fn list_habits(&self) -> Result<Vec<Habit>>;

    async fn get_habit(&self, id: &str) -> Result<Habit>;

    async fn create_habit(&self, request: CreateHabitRequest) -> Result<Habit>;

    async fn update_habit(&self, id: &str, request: UpdateHabitRequest) -> Result<Habit>;

    async fn delete_habit(&self, id: &str) -> Result<()>;

    /// Records a completion; `None` lets the server use its own today.
    /// A duplicate for the same day fails with [`ClientError::AlreadyCompleted`].
    async fn complete_habit(&self, id: &str, date: Option<DateKey>) -> Result<()>;

    async fn remove_completion(&self, id: &str, date: DateKey) -> Result<()>;

    async fn list_completions(&self, id: &str) -> Result<Vec<Completion>>;

    async fn get_statistics(&self, id: &str) -> Result<Statistics>;
}

/// Validation applied before a create request leaves the client.
pub fn validate_create(request: CreateHabitRequest) -> Result<CreateHabitRequest> {
    let request = request.normalized();
    if request.name.is_empty() {
        return Err(ClientError::validation("habit name is required"));
    }
    if request.color.is_empty() {
        return Err(ClientError::validation("habit color is required"));
    }
    Ok(request)
}

#[derive(Debug, Clone)]
pub struct HttpHabitApi {
    client: Client,
    base_url: String,
}

impl HttpHabitApi {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Network)?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let bytes = response.bytes().await.unwrap_or_default();
        let message = error_message(status, &bytes);

        warn!(%status, %url, "request failed: {message}");
        Err(ClientError::from_status(status, message))
    }
}

/// Message for a failed response: the body's `error` field when it is set,
/// the status line when the JSON carries none, `Unknown error` when the body
/// is not JSON at all.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(ApiErrorBody { error: Some(error) }) if !error.is_empty() => error,
        Ok(_) => format!("HTTP error! status: {}", status.as_u16()),
        Err(_) => "Unknown error".to_string(),
    }
}

#[async_trait]
impl HabitApi for HttpHabitApi {
    async fn list_habits(&self) -> Result<Vec<Habit>> {
        let response = self.client.get(self.url("/habits")).send().await?;
        Self::json(response).await
    }

    async fn get_habit(&self, id: &str) -> Result<Habit> {
        let response = self
            .client
            .get(self.url(&format!("/habits/{id}")))
            .send()
            .await?;
        Self::json(response).await
    }

    async fn create_habit(&self, request: CreateHabitRequest) -> Result<Habit> {
        let request = validate_create(request)?;
        debug!(name = %request.name, "creating habit");
        let response = self
            .client
            .post(self.url("/habits"))
            .json(&request)
            .send()
            .await?;
        Self::json(response).await
    }

    async fn update_habit(&self, id: &str, request: UpdateHabitRequest) -> Result<Habit> {
        let response = self
            .client
            .put(self.url(&format!("/habits/{id}")))
            .json(&request)
            .send()
            .await?;
        Self::json(response).await
    }

    async fn delete_habit(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/habits/{id}")))
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn complete_habit(&self, id: &str, date: Option<DateKey>) -> Result<()> {
        let response = self
            .client
            .post(self.url(&format!("/habits/{id}/complete")))
            .json(&CompleteHabitRequest { date })
            .send()
            .await?;
        Self::ensure_success(response)
            .await
            .map_err(ClientError::into_completion_conflict)?;
        Ok(())
    }

    async fn remove_completion(&self, id: &str, date: DateKey) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/habits/{id}/complete/{date}")))
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn list_completions(&self, id: &str) -> Result<Vec<Completion>> {
        let response = self
            .client
            .get(self.url(&format!("/habits/{id}/completions")))
            .send()
            .await?;
        Self::json(response).await
    }

    async fn get_statistics(&self, id: &str) -> Result<Statistics> {
        let response = self
            .client
            .get(self.url(&format!("/habits/{id}/statistics")))
            .send()
            .await?;
        Self::json(response).await
    }
}
