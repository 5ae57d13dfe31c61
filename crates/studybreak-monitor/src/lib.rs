//! Studybreak Monitor - Stateful side of the study/break coaching loop
//!
//! [`SessionController`] owns the session counters, the cached recommendation
//! and the goal. [`NotificationDispatcher`] throttles alerts across the desktop
//! and toast channels, and [`TrainingRunner`] drives a batch training request
//! behind a single-run latch with a cosmetic progress animation.

mod controller;
mod error;
mod kv_store;
mod notify;
mod progress;
mod stats;
mod training;

pub use controller::{
    ActionReport, GoalUpdate, SessionController, SessionSnapshot, StatusSnapshot,
};
pub use error::{MonitorError, MonitorResult};
pub use kv_store::{KvStore, NOTIFICATION_PERMISSION_KEY, SESSION_GOAL_KEY, STATE_DIR};
pub use notify::{
    AlertChannel, DesktopAlert, Dispatch, NotificationDispatcher, NotificationEvent,
    NotificationPermission, SilentAlert, Throttle, Toast, ToastBoard, ToastPhase, ToastTiming,
    ToastView, APP_TITLE,
};
pub use progress::{goal_progress, validate_goal, DEFAULT_GOAL_MINUTES, MAX_GOAL_MINUTES};
pub use stats::{
    fetch_learning_stats, fetch_training_stats, ActionShareRow, LearningStatsView, SessionRow,
    TrainingStatsView, NO_SESSIONS_PLACEHOLDER,
};
pub use training::{
    ProgressFrame, ProgressSink, ProgressSource, SimulatedProgress, TrainingRun, TrainingRunner,
};
