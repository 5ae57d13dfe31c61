//! reqwest implementation of [`DecisionBackend`]

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use studybreak_protocol::{
    ActionId, ActionRequest, ActionResponse, LearningStatsResponse, Preferences,
    RecommendationResponse, StatsResponse, StatusResponse, TrainRequest, TrainResponse,
};

use crate::{BackendConfig, BackendError, BackendResult, DecisionBackend};

/// JSON-over-HTTP client for the `/api/*` endpoints
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(BackendError::Configuration(
                "base_url must not be empty".to_string(),
            ));
        }

        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> BackendResult<T> {
        let url = self.endpoint(path);
        tracing::debug!(url = %url, "GET");
        let response = self.client.get(&url).send().await?;
        decode(response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> BackendResult<T>
    where
        B: serde::Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(url = %url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        decode(response).await
    }
}

async fn check_status(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
    let response = check_status(response).await?;
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| BackendError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl DecisionBackend for HttpBackend {
    async fn status(&self) -> BackendResult<StatusResponse> {
        self.get("status").await
    }

    async fn preferences(&self) -> BackendResult<Preferences> {
        self.get("preferences").await
    }

    async fn save_preferences(&self, preferences: Preferences) -> BackendResult<Preferences> {
        self.post("preferences", &preferences).await
    }

    async fn recommendation(&self) -> BackendResult<RecommendationResponse> {
        self.get("recommendation").await
    }

    async fn submit_action(&self, action: ActionId) -> BackendResult<ActionResponse> {
        self.post("action", &ActionRequest { action }).await
    }

    async fn reset(&self) -> BackendResult<()> {
        let url = self.endpoint("reset");
        tracing::debug!(url = %url, "POST");
        let response = self.client.post(&url).send().await?;
        // Body is the fresh environment state; nothing in it is needed.
        check_status(response).await.map(|_| ())
    }

    async fn train(&self, episodes: u32) -> BackendResult<TrainResponse> {
        self.post("train", &TrainRequest { episodes }).await
    }

    async fn stats(&self) -> BackendResult<StatsResponse> {
        self.get("stats").await
    }

    async fn learning_stats(&self) -> BackendResult<LearningStatsResponse> {
        self.get("learning-stats").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let backend = HttpBackend::new(BackendConfig::new("http://localhost:5000/")).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:5000");
        assert_eq!(
            backend.endpoint("learning-stats"),
            "http://localhost:5000/api/learning-stats"
        );
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let result = HttpBackend::new(BackendConfig::new("  "));
        assert!(matches!(result, Err(BackendError::Configuration(_))));
    }
}
