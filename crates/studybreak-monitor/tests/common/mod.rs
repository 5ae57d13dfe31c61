//! Scripted backend for controller tests
//!
//! Each endpoint pops queued replies first and falls back to a fixed value.
//! A gate can hold the next call of an endpoint until the test releases it.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use studybreak_client::{BackendError, BackendResult, DecisionBackend};
use studybreak_config::NotificationSettings;
use studybreak_monitor::{
    AlertChannel, KvStore, NotificationDispatcher, SessionController,
};
use studybreak_protocol::{
    ActionId, ActionResponse, FatigueReading, LearningStatsResponse, Preferences,
    RecommendationResponse, StatsResponse, StatusResponse, TrainResponse,
};
use tempfile::TempDir;
use tokio::sync::Notify;

struct Script<T> {
    queue: VecDeque<Result<T, u16>>,
    fallback: Result<T, u16>,
}

impl<T: Clone> Script<T> {
    fn new(fallback: Result<T, u16>) -> Self {
        Self {
            queue: VecDeque::new(),
            fallback,
        }
    }

    fn next(&mut self) -> BackendResult<T> {
        self.queue
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
            .map_err(|status| BackendError::Status {
                status,
                body: "scripted failure".to_string(),
            })
    }
}

/// Holds one call until released
#[derive(Clone, Default)]
pub struct Gate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl Gate {
    /// Wait until the gated call has reached the backend
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

pub struct MockBackend {
    status: Mutex<Script<StatusResponse>>,
    recommendation: Mutex<Script<RecommendationResponse>>,
    action: Mutex<Script<ActionResponse>>,
    preferences: Mutex<Script<Preferences>>,
    train: Mutex<Script<TrainResponse>>,
    stats: Mutex<Script<StatsResponse>>,
    learning_stats: Mutex<Script<LearningStatsResponse>>,
    reset_status: Mutex<Option<u16>>,
    calls: Mutex<Vec<String>>,
    gates: Mutex<HashMap<&'static str, Gate>>,
}

pub fn status(study_time: f64) -> StatusResponse {
    StatusResponse {
        study_time,
        fatigue: FatigueReading::Label("low".to_string()),
    }
}

pub fn recommend(action: ActionId) -> RecommendationResponse {
    RecommendationResponse {
        recommended_action: action,
        action_icon: "📚".to_string(),
        action_name: format!("Action {}", action),
        action_description: String::new(),
    }
}

pub fn outcome(reward: f64, study_time: f64, done: bool) -> ActionResponse {
    ActionResponse {
        reward,
        study_time,
        done,
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            status: Mutex::new(Script::new(Ok(status(0.0)))),
            recommendation: Mutex::new(Script::new(Ok(recommend(0)))),
            action: Mutex::new(Script::new(Err(503))),
            preferences: Mutex::new(Script::new(Ok(Preferences::default()))),
            train: Mutex::new(Script::new(Err(503))),
            stats: Mutex::new(Script::new(Ok(StatsResponse::default()))),
            learning_stats: Mutex::new(Script::new(Ok(LearningStatsResponse::default()))),
            reset_status: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn queue_status(&self, reply: Result<StatusResponse, u16>) {
        self.status.lock().unwrap().queue.push_back(reply);
    }

    pub fn set_status(&self, reply: Result<StatusResponse, u16>) {
        self.status.lock().unwrap().fallback = reply;
    }

    pub fn queue_recommendation(&self, reply: Result<RecommendationResponse, u16>) {
        self.recommendation.lock().unwrap().queue.push_back(reply);
    }

    pub fn set_recommendation(&self, reply: Result<RecommendationResponse, u16>) {
        self.recommendation.lock().unwrap().fallback = reply;
    }

    pub fn queue_action(&self, reply: Result<ActionResponse, u16>) {
        self.action.lock().unwrap().queue.push_back(reply);
    }

    pub fn queue_preferences(&self, reply: Result<Preferences, u16>) {
        self.preferences.lock().unwrap().queue.push_back(reply);
    }

    pub fn queue_train(&self, reply: Result<TrainResponse, u16>) {
        self.train.lock().unwrap().queue.push_back(reply);
    }

    pub fn set_stats(&self, reply: Result<StatsResponse, u16>) {
        self.stats.lock().unwrap().fallback = reply;
    }

    pub fn fail_reset(&self, status: u16) {
        *self.reset_status.lock().unwrap() = Some(status);
    }

    /// Gate the next call to `endpoint`
    pub fn gate(&self, endpoint: &'static str) -> Gate {
        let gate = Gate::default();
        self.gates.lock().unwrap().insert(endpoint, gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.as_str() == endpoint)
            .count()
    }

    async fn enter(&self, endpoint: &'static str) {
        self.calls.lock().unwrap().push(endpoint.to_string());
        let gate = self.gates.lock().unwrap().remove(endpoint);
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }
}

#[async_trait]
impl DecisionBackend for MockBackend {
    async fn status(&self) -> BackendResult<StatusResponse> {
        self.enter("status").await;
        self.status.lock().unwrap().next()
    }

    async fn preferences(&self) -> BackendResult<Preferences> {
        self.enter("preferences").await;
        self.preferences.lock().unwrap().next()
    }

    async fn save_preferences(&self, preferences: Preferences) -> BackendResult<Preferences> {
        self.enter("save_preferences").await;
        let mut script = self.preferences.lock().unwrap();
        match script.queue.pop_front() {
            Some(reply) => reply.map_err(|status| BackendError::Status {
                status,
                body: "scripted failure".to_string(),
            }),
            None => Ok(preferences),
        }
    }

    async fn recommendation(&self) -> BackendResult<RecommendationResponse> {
        self.enter("recommendation").await;
        self.recommendation.lock().unwrap().next()
    }

    async fn submit_action(&self, action: ActionId) -> BackendResult<ActionResponse> {
        self.enter("action").await;
        self.calls.lock().unwrap().push(format!("action:{}", action));
        self.action.lock().unwrap().next()
    }

    async fn reset(&self) -> BackendResult<()> {
        self.enter("reset").await;
        match *self.reset_status.lock().unwrap() {
            Some(status) => Err(BackendError::Status {
                status,
                body: "scripted failure".to_string(),
            }),
            None => Ok(()),
        }
    }

    async fn train(&self, _episodes: u32) -> BackendResult<TrainResponse> {
        self.enter("train").await;
        self.train.lock().unwrap().next()
    }

    async fn stats(&self) -> BackendResult<StatsResponse> {
        self.enter("stats").await;
        self.stats.lock().unwrap().next()
    }

    async fn learning_stats(&self) -> BackendResult<LearningStatsResponse> {
        self.enter("learning_stats").await;
        self.learning_stats.lock().unwrap().next()
    }
}

/// Desktop channel that records what it was asked to show
#[derive(Clone, Default)]
pub struct RecordingAlert {
    pub delivered: Arc<Mutex<Vec<(String, String)>>>,
}

impl AlertChannel for RecordingAlert {
    fn deliver(&self, title: &str, body: &str) {
        self.delivered
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }
}

pub struct Harness {
    pub backend: Arc<MockBackend>,
    pub controller: Arc<SessionController>,
    pub alerts: RecordingAlert,
    pub state_dir: TempDir,
}

/// Controller over a fresh state dir with the given throttle window
pub fn harness(throttle_ms: u64) -> Harness {
    harness_with(MockBackend::new(), throttle_ms, TempDir::new().unwrap())
}

pub fn harness_with(backend: MockBackend, throttle_ms: u64, state_dir: TempDir) -> Harness {
    let backend = Arc::new(backend);
    let alerts = RecordingAlert::default();
    let settings = NotificationSettings {
        throttle_ms,
        ..NotificationSettings::default()
    };
    let notifier = NotificationDispatcher::new(&settings, Box::new(alerts.clone()));
    let store = KvStore::open_in(state_dir.path());
    let controller = Arc::new(SessionController::new(backend.clone(), store, notifier));

    Harness {
        backend,
        controller,
        alerts,
        state_dir,
    }
}
