//! Wiring of backend, state store and controller

use std::path::Path;
use std::sync::Arc;

use studybreak_client::{BackendConfig, BackendError, DecisionBackend, HttpBackend};
use studybreak_config::StudybreakConfig;
use studybreak_monitor::{
    AlertChannel, DesktopAlert, KvStore, NotificationDispatcher, SessionController, SilentAlert,
    TrainingRunner,
};

pub struct App {
    pub config: StudybreakConfig,
    pub controller: Arc<SessionController>,
    pub training: TrainingRunner,
}

impl App {
    pub fn new(config: StudybreakConfig, state_dir: Option<&Path>) -> Result<Self, BackendError> {
        let backend: Arc<dyn DecisionBackend> = Arc::new(HttpBackend::new(BackendConfig {
            base_url: config.server.base_url.clone(),
            timeout_seconds: config.server.timeout_secs,
        })?);

        let store = match state_dir {
            Some(dir) => KvStore::open_in(dir),
            None => KvStore::open_default(),
        };
        tracing::debug!(path = %store.path().display(), "Using client state file");

        let alerts: Box<dyn AlertChannel> = match DesktopAlert::detect() {
            Some(desktop) => Box::new(desktop),
            None => Box::new(SilentAlert),
        };
        let notifier = NotificationDispatcher::new(&config.notifications, alerts);
        let controller = Arc::new(SessionController::new(backend.clone(), store, notifier));
        let training = TrainingRunner::from_settings(backend, &config.training);

        Ok(Self {
            config,
            controller,
            training,
        })
    }
}
