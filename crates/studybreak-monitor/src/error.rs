use studybreak_client::BackendError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Please enter a valid goal between 1 and 480 minutes (got {minutes})")]
    Validation { minutes: i64 },

    #[error("No recommendation available")]
    NoRecommendationAvailable,

    #[error("Error executing action: {0}")]
    ActionSubmission(#[source] BackendError),

    #[error("An action is already being executed")]
    ActionInFlight,

    #[error("Session was restarted while the action was pending")]
    Superseded,

    #[error("Could not save preferences: {0}")]
    PreferenceSave(#[source] BackendError),

    #[error("Error during training: {0}")]
    Training(#[source] BackendError),

    #[error("Failed to persist client state: {0}")]
    Persistence(#[from] std::io::Error),
}

impl MonitorError {
    /// Whether the failure should be shown to the user as a blocking alert
    ///
    /// Everything the controller returns is user-facing except a latch
    /// collision, which only means the first call is still running.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::ActionInFlight)
    }

    /// Whether the same call may succeed if repeated later
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ActionSubmission(error) | Self::PreferenceSave(error) | Self::Training(error) => {
                error.is_transient()
            }
            _ => false,
        }
    }
}

pub type MonitorResult<T> = Result<T, MonitorError>;
