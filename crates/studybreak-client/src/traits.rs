use async_trait::async_trait;
use studybreak_protocol::{
    ActionId, ActionResponse, LearningStatsResponse, Preferences, RecommendationResponse,
    StatsResponse, StatusResponse, TrainResponse,
};

use crate::BackendError;

pub type BackendResult<T> = Result<T, BackendError>;

/// Remote decision and training service
///
/// Every call maps to exactly one request; nothing is retried here.
#[async_trait]
pub trait DecisionBackend: Send + Sync {
    async fn status(&self) -> BackendResult<StatusResponse>;

    async fn preferences(&self) -> BackendResult<Preferences>;

    /// Store preferences, returning the values the service accepted
    async fn save_preferences(&self, preferences: Preferences) -> BackendResult<Preferences>;

    async fn recommendation(&self) -> BackendResult<RecommendationResponse>;

    async fn submit_action(&self, action: ActionId) -> BackendResult<ActionResponse>;

    async fn reset(&self) -> BackendResult<()>;

    /// Run a batch of training episodes and return once the batch is done
    async fn train(&self, episodes: u32) -> BackendResult<TrainResponse>;

    async fn stats(&self) -> BackendResult<StatsResponse>;

    async fn learning_stats(&self) -> BackendResult<LearningStatsResponse>;
}
