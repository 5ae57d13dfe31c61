//! Session controller
//!
//! One controller per active monitor view. Counters, goal, cached
//! recommendation and preferences live behind a single mutex that is never
//! held across a backend call. Every async result is tagged with the
//! generation it was started in and dropped if the view was re-initialized
//! in the meantime.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use studybreak_client::DecisionBackend;
use studybreak_protocol::{
    ActionKind, ActionResponse, FatigueReading, Preferences, RecommendationResponse,
};

use crate::kv_store::{KvStore, NOTIFICATION_PERMISSION_KEY, SESSION_GOAL_KEY};
use crate::notify::{Dispatch, NotificationDispatcher, NotificationPermission};
use crate::progress::{goal_progress, validate_goal, DEFAULT_GOAL_MINUTES};
use crate::stats::{fetch_learning_stats, fetch_training_stats};
use crate::{LearningStatsView, MonitorError, MonitorResult, TrainingStatsView};

const BREAK_ICON: &str = "☕";
const GOAL_ICON: &str = "🎉";
const DONE_ICON: &str = "✅";

#[derive(Debug)]
struct SessionState {
    generation: u64,
    accumulated_reward: f64,
    step_count: u64,
    session_goal_minutes: u32,
    study_time: f64,
    fatigue: Option<FatigueReading>,
    recommendation: Option<RecommendationResponse>,
    preferences: Preferences,
}

impl SessionState {
    fn new(session_goal_minutes: u32) -> Self {
        Self {
            generation: 0,
            accumulated_reward: 0.0,
            step_count: 0,
            session_goal_minutes,
            study_time: 0.0,
            fatigue: None,
            recommendation: None,
            preferences: Preferences::default(),
        }
    }

    fn progress(&self) -> f64 {
        goal_progress(self.study_time, self.session_goal_minutes)
    }

    fn clear_counters(&mut self) {
        self.accumulated_reward = 0.0;
        self.step_count = 0;
    }
}

/// Point-in-time copy of the session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub accumulated_reward: f64,
    pub step_count: u64,
    pub session_goal_minutes: u32,
    pub study_time: f64,
    pub fatigue: Option<String>,
    pub progress: f64,
    pub recommendation: Option<RecommendationResponse>,
    pub preferences: Preferences,
}

/// Result of a successful status refresh
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub study_time: f64,
    pub fatigue: String,
    pub step_count: u64,
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalUpdate {
    pub goal_minutes: u32,
    pub progress: f64,
    pub notification: Dispatch,
}

/// Everything a front end needs after [`SessionController::take_action`]
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub action: ActionKind,
    pub recommendation: RecommendationResponse,
    pub outcome: ActionResponse,
    /// Counters after the action, already cleared when the session completed
    pub accumulated_reward: f64,
    pub step_count: u64,
    /// Progress from the study time the backend returned
    pub progress: f64,
    pub goal_reached: bool,
    /// Reward of the session that just completed
    pub final_reward: Option<f64>,
    /// Break, goal and completion notifications in that order
    pub notifications: Vec<Dispatch>,
}

impl ActionReport {
    pub fn session_completed(&self) -> bool {
        self.final_reward.is_some()
    }
}

/// RAII guard for the in-flight action latch
struct ActionGuard<'a> {
    in_flight: &'a AtomicBool,
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

pub struct SessionController {
    backend: Arc<dyn DecisionBackend>,
    notifier: NotificationDispatcher,
    store: Mutex<KvStore>,
    state: Mutex<SessionState>,
    action_in_flight: AtomicBool,
}

impl SessionController {
    pub fn new(
        backend: Arc<dyn DecisionBackend>,
        store: KvStore,
        notifier: NotificationDispatcher,
    ) -> Self {
        let goal = persisted_goal(&store);
        notifier.set_permission(persisted_permission(&store));

        Self {
            backend,
            notifier,
            store: Mutex::new(store),
            state: Mutex::new(SessionState::new(goal)),
            action_in_flight: AtomicBool::new(false),
        }
    }

    pub fn notifications(&self) -> &NotificationDispatcher {
        &self.notifier
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn session_goal(&self) -> u32 {
        self.state.lock().session_goal_minutes
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        SessionSnapshot {
            generation: state.generation,
            accumulated_reward: state.accumulated_reward,
            step_count: state.step_count,
            session_goal_minutes: state.session_goal_minutes,
            study_time: state.study_time,
            fatigue: state.fatigue.as_ref().map(|f| f.to_string()),
            progress: state.progress(),
            recommendation: state.recommendation.clone(),
            preferences: state.preferences,
        }
    }

    /// (Re)activate the view.
    ///
    /// Starts a new generation, zeroes the counters, reloads the persisted goal
    /// and permission, then pulls preferences, status and a recommendation.
    pub async fn initialize(&self) -> SessionSnapshot {
        let (goal, permission) = {
            let store = self.store.lock();
            (persisted_goal(&store), persisted_permission(&store))
        };
        self.notifier.set_permission(permission);

        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.clear_counters();
            state.session_goal_minutes = goal;
            state.recommendation = None;
            state.generation
        };
        tracing::debug!(generation, goal, "Session view initialized");

        if permission == NotificationPermission::Default {
            tracing::info!("Desktop notifications have not been allowed yet");
        }

        self.load_preferences().await;
        self.refresh_status().await;
        self.refresh_recommendation().await;
        self.snapshot()
    }

    /// Validate, persist and apply a new goal
    pub fn set_goal(&self, minutes: i64) -> MonitorResult<GoalUpdate> {
        let goal = validate_goal(minutes)?;
        self.store.lock().set(SESSION_GOAL_KEY, goal)?;

        let progress = {
            let mut state = self.state.lock();
            state.session_goal_minutes = goal;
            state.progress()
        };

        let notification = self.notifier.notify(
            DONE_ICON,
            &format!("Session goal updated to {} minutes", goal),
        );

        Ok(GoalUpdate {
            goal_minutes: goal,
            progress,
            notification,
        })
    }

    /// Persist the desktop alert permission and apply it
    pub fn set_notification_permission(
        &self,
        permission: NotificationPermission,
    ) -> MonitorResult<()> {
        self.store
            .lock()
            .set(NOTIFICATION_PERMISSION_KEY, permission)?;
        self.notifier.set_permission(permission);
        Ok(())
    }

    /// Zero the counters whether or not the backend acknowledged the reset
    pub async fn reset(&self) -> SessionSnapshot {
        if let Err(error) = self.backend.reset().await {
            tracing::warn!(error = %error, "Error resetting session");
        }

        self.state.lock().clear_counters();
        self.refresh_status().await;
        self.snapshot()
    }

    pub async fn refresh_status(&self) -> Option<StatusSnapshot> {
        let generation = self.generation();
        let status = match self.backend.status().await {
            Ok(status) => status,
            Err(error) => {
                tracing::warn!(error = %error, "Error updating status");
                return None;
            }
        };

        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::debug!(generation, "Discarding status from a previous view");
            return None;
        }

        state.study_time = status.study_time;
        let fatigue = status.fatigue.to_string();
        state.fatigue = Some(status.fatigue);

        Some(StatusSnapshot {
            study_time: state.study_time,
            fatigue,
            step_count: state.step_count,
            progress: state.progress(),
        })
    }

    /// Replace the cached recommendation. On failure the cache is left alone.
    pub async fn refresh_recommendation(&self) -> Option<RecommendationResponse> {
        let generation = self.generation();
        let recommendation = match self.backend.recommendation().await {
            Ok(recommendation) => recommendation,
            Err(error) => {
                tracing::warn!(error = %error, "Error updating recommendation");
                return None;
            }
        };

        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::debug!(generation, "Discarding recommendation from a previous view");
            return None;
        }

        state.recommendation = Some(recommendation.clone());
        Some(recommendation)
    }

    fn try_begin_action(&self) -> MonitorResult<ActionGuard<'_>> {
        self.action_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ActionGuard {
                in_flight: &self.action_in_flight,
            })
            .map_err(|_| MonitorError::ActionInFlight)
    }

    /// Submit the recommended action and apply its outcome.
    ///
    /// A failed submission leaves counters and cache exactly as they were.
    pub async fn take_action(&self) -> MonitorResult<ActionReport> {
        let _guard = self.try_begin_action()?;
        let generation = self.generation();

        let cached = self.state.lock().recommendation.clone();
        let recommendation = match cached {
            Some(recommendation) => recommendation,
            None => self
                .refresh_recommendation()
                .await
                .ok_or(MonitorError::NoRecommendationAvailable)?,
        };

        let action = recommendation.kind();
        let outcome = self
            .backend
            .submit_action(action.id())
            .await
            .map_err(MonitorError::ActionSubmission)?;

        let (accumulated_reward, step_count, progress, goal, final_reward) = {
            let mut state = self.state.lock();
            if state.generation != generation {
                tracing::warn!(
                    generation,
                    action = action.id(),
                    "Session restarted while the action was pending, outcome dropped"
                );
                return Err(MonitorError::Superseded);
            }

            state.accumulated_reward += outcome.reward;
            state.step_count += 1;
            state.study_time = outcome.study_time;
            state.recommendation = None;
            let progress = state.progress();

            let final_reward = outcome.done.then(|| {
                let reward = state.accumulated_reward;
                state.clear_counters();
                reward
            });

            (
                state.accumulated_reward,
                state.step_count,
                progress,
                state.session_goal_minutes,
                final_reward,
            )
        };

        let mut notifications = Vec::new();
        if let Some(length) = action.break_length() {
            notifications.push(
                self.notifier
                    .notify(BREAK_ICON, &format!("Time for a {} break!", length)),
            );
        }

        // Fires on every action past the goal, not only on the crossing.
        let goal_reached = outcome.study_time >= f64::from(goal);
        if goal_reached {
            notifications.push(
                self.notifier
                    .notify(GOAL_ICON, "Daily goal reached! Excellent work!"),
            );
        }

        if let Some(reward) = final_reward {
            notifications.push(
                self.notifier
                    .notify(DONE_ICON, &format!("Session completed! Reward: {}", reward)),
            );
        }

        tracing::debug!(
            action = action.id(),
            reward = outcome.reward,
            study_time = outcome.study_time,
            done = outcome.done,
            "Action applied"
        );

        self.refresh_status().await;
        self.refresh_recommendation().await;

        Ok(ActionReport {
            action,
            recommendation,
            outcome,
            accumulated_reward,
            step_count,
            progress,
            goal_reached,
            final_reward,
            notifications,
        })
    }

    pub fn preferences(&self) -> Preferences {
        self.state.lock().preferences
    }

    pub async fn load_preferences(&self) -> Option<Preferences> {
        let generation = self.generation();
        let preferences = match self.backend.preferences().await {
            Ok(preferences) => preferences,
            Err(error) => {
                tracing::warn!(error = %error, "Error loading preferences");
                return None;
            }
        };

        let mut state = self.state.lock();
        if state.generation != generation {
            return None;
        }
        state.preferences = preferences;
        Some(preferences)
    }

    /// Store preferences and keep what the backend echoed back
    pub async fn save_preferences(&self, preferences: Preferences) -> MonitorResult<Preferences> {
        let saved = self
            .backend
            .save_preferences(preferences)
            .await
            .map_err(MonitorError::PreferenceSave)?;

        self.state.lock().preferences = saved;
        self.notifier.notify(DONE_ICON, "Preferences saved");
        Ok(saved)
    }

    pub async fn training_stats(&self) -> Option<TrainingStatsView> {
        fetch_training_stats(self.backend.as_ref()).await
    }

    pub async fn learning_stats(&self) -> Option<LearningStatsView> {
        fetch_learning_stats(self.backend.as_ref()).await
    }
}

fn persisted_goal(store: &KvStore) -> u32 {
    if !store.contains(SESSION_GOAL_KEY) {
        return DEFAULT_GOAL_MINUTES;
    }

    match store.get::<i64>(SESSION_GOAL_KEY).map(validate_goal) {
        Some(Ok(goal)) => goal,
        _ => {
            tracing::warn!(
                path = %store.path().display(),
                "Ignoring invalid persisted session goal, using {} minutes",
                DEFAULT_GOAL_MINUTES
            );
            DEFAULT_GOAL_MINUTES
        }
    }
}

fn persisted_permission(store: &KvStore) -> NotificationPermission {
    store
        .get::<NotificationPermission>(NOTIFICATION_PERMISSION_KEY)
        .unwrap_or_default()
}
