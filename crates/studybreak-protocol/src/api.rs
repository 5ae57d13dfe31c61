//! Request and response bodies of the `/api/*` endpoints

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::action::{ActionId, ActionKind};

/// Fatigue as reported by the status endpoint
///
/// Older backends send a numeric level, newer ones a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FatigueReading {
    Level(serde_json::Number),
    Label(String),
}

impl Default for FatigueReading {
    fn default() -> Self {
        Self::Label(String::new())
    }
}

impl std::fmt::Display for FatigueReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Level(level) => write!(f, "{}", level),
            Self::Label(label) => write!(f, "{}", label),
        }
    }
}

/// GET `/api/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub study_time: f64,
    #[serde(default)]
    pub fatigue: FatigueReading,
}

/// GET `/api/recommendation`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommended_action: ActionId,
    #[serde(default)]
    pub action_icon: String,
    #[serde(default)]
    pub action_name: String,
    #[serde(default)]
    pub action_description: String,
}

impl RecommendationResponse {
    pub fn kind(&self) -> ActionKind {
        ActionKind::from_id(self.recommended_action)
    }
}

/// POST `/api/action` request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: ActionId,
}

/// POST `/api/action` response
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub reward: f64,
    pub study_time: f64,
    pub done: bool,
}

/// POST `/api/train` request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainRequest {
    pub episodes: u32,
}

/// POST `/api/train` response
///
/// The backend echoes its whole training state; only the total is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainResponse {
    pub total_episodes: u32,
}

/// GET `/api/stats`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub average_reward: f64,
    #[serde(default)]
    pub max_reward: f64,
    #[serde(default)]
    pub min_reward: f64,
    #[serde(default)]
    pub episodes: u64,
    #[serde(default)]
    pub rewards_history: Vec<f64>,
}

/// One bucket of the action distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionShare {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub percentage: f64,
    pub count: u64,
}

/// A finished session as recorded by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: String,
    pub study_time: f64,
    pub reward: f64,
}

/// GET `/api/learning-stats`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LearningStatsResponse {
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub average_reward: f64,
    #[serde(default)]
    pub total_study_time: f64,
    #[serde(default)]
    pub action_distribution: BTreeMap<ActionId, ActionShare>,
    #[serde(default)]
    pub recent_sessions: Vec<SessionRecord>,
}
