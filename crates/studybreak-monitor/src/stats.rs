//! Render-ready statistics
//!
//! Both fetches are cosmetic: a failure is logged and yields `None`.

use studybreak_client::DecisionBackend;
use studybreak_protocol::{ActionKind, LearningStatsResponse, StatsResponse};

/// Shown instead of the sessions table when there is no history yet
pub const NO_SESSIONS_PLACEHOLDER: &str = "No sessions yet. Start studying!";

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingStatsView {
    pub average_reward: String,
    pub max_reward: String,
    pub episodes: u64,
    /// `(episode number starting at 1, reward)`
    pub series: Vec<(usize, f64)>,
}

impl From<&StatsResponse> for TrainingStatsView {
    fn from(stats: &StatsResponse) -> Self {
        Self {
            average_reward: format!("{:.2}", stats.average_reward),
            max_reward: format!("{:.2}", stats.max_reward),
            episodes: stats.episodes,
            series: stats
                .rewards_history
                .iter()
                .enumerate()
                .map(|(i, reward)| (i + 1, *reward))
                .collect(),
        }
    }
}

impl TrainingStatsView {
    /// The reward chart is only drawn for a non-empty history
    pub fn has_series(&self) -> bool {
        !self.series.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionShareRow {
    pub action: ActionKind,
    pub label: String,
    pub percentage: String,
    pub count: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionRow {
    pub date: String,
    pub study_time: String,
    pub reward: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LearningStatsView {
    pub total_sessions: u64,
    pub average_reward: String,
    pub total_study_time: String,
    pub distribution: Vec<ActionShareRow>,
    pub recent_sessions: Vec<SessionRow>,
}

impl LearningStatsView {
    pub fn placeholder(&self) -> Option<&'static str> {
        self.recent_sessions
            .is_empty()
            .then_some(NO_SESSIONS_PLACEHOLDER)
    }
}

impl From<&LearningStatsResponse> for LearningStatsView {
    fn from(stats: &LearningStatsResponse) -> Self {
        let distribution = stats
            .action_distribution
            .iter()
            .map(|(id, share)| {
                let action = ActionKind::from_id(*id);
                ActionShareRow {
                    action,
                    label: share.name.clone().unwrap_or_else(|| action.label()),
                    percentage: format!("{:.1}%", share.percentage),
                    count: format!("{} times", share.count),
                }
            })
            .collect();

        let recent_sessions = stats
            .recent_sessions
            .iter()
            .map(|session| SessionRow {
                date: session.date.clone(),
                study_time: format!("{} min", session.study_time),
                reward: session.reward.to_string(),
            })
            .collect();

        Self {
            total_sessions: stats.total_sessions,
            average_reward: format!("{:.1}", stats.average_reward),
            total_study_time: stats.total_study_time.to_string(),
            distribution,
            recent_sessions,
        }
    }
}

pub async fn fetch_training_stats(backend: &dyn DecisionBackend) -> Option<TrainingStatsView> {
    match backend.stats().await {
        Ok(stats) => Some(TrainingStatsView::from(&stats)),
        Err(error) => {
            tracing::warn!(error = %error, "Error updating stats");
            None
        }
    }
}

pub async fn fetch_learning_stats(backend: &dyn DecisionBackend) -> Option<LearningStatsView> {
    match backend.learning_stats().await {
        Ok(stats) => Some(LearningStatsView::from(&stats)),
        Err(error) => {
            tracing::warn!(error = %error, "Error loading learning stats");
            None
        }
    }
}
