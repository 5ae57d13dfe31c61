//! Throttled dual-channel notifications
//!
//! A notification that passes the throttle always becomes a toast, and also a
//! desktop alert when permission was granted. One that does not pass is lost.

mod desktop;
mod throttle;
mod toast;

pub use desktop::{AlertChannel, DesktopAlert, NotificationPermission, SilentAlert};
pub use throttle::Throttle;
pub use toast::{Toast, ToastBoard, ToastPhase, ToastTiming, ToastView};

use parking_lot::Mutex;
use studybreak_config::NotificationSettings;

/// Application name shown in desktop alert titles
pub const APP_TITLE: &str = "Study Break Optimizer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub icon: String,
    pub message: String,
    pub timestamp_ms: i64,
}

/// Result of a single [`NotificationDispatcher::notify`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Delivered(NotificationEvent),
    Throttled,
}

impl Dispatch {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }

    pub fn event(&self) -> Option<&NotificationEvent> {
        match self {
            Self::Delivered(event) => Some(event),
            Self::Throttled => None,
        }
    }
}

struct DispatcherState {
    throttle: Throttle,
    permission: NotificationPermission,
    toasts: ToastBoard,
}

pub struct NotificationDispatcher {
    state: Mutex<DispatcherState>,
    alerts: Box<dyn AlertChannel>,
}

impl NotificationDispatcher {
    pub fn new(settings: &NotificationSettings, alerts: Box<dyn AlertChannel>) -> Self {
        Self {
            state: Mutex::new(DispatcherState {
                throttle: Throttle::new(settings.throttle_ms),
                permission: NotificationPermission::Default,
                toasts: ToastBoard::new(ToastTiming::from_settings(settings)),
            }),
            alerts,
        }
    }

    pub fn permission(&self) -> NotificationPermission {
        self.state.lock().permission
    }

    pub fn set_permission(&self, permission: NotificationPermission) {
        self.state.lock().permission = permission;
    }

    pub fn notify(&self, icon: &str, message: &str) -> Dispatch {
        self.notify_at(icon, message, chrono::Utc::now().timestamp_millis())
    }

    /// [`Self::notify`] with an explicit clock reading
    pub fn notify_at(&self, icon: &str, message: &str, now_ms: i64) -> Dispatch {
        let desktop = {
            let mut state = self.state.lock();
            if !state.throttle.try_acquire(now_ms) {
                tracing::debug!(message, "Notification throttled");
                return Dispatch::Throttled;
            }
            state.toasts.show(icon, message);
            state.permission == NotificationPermission::Granted
        };

        if desktop {
            self.alerts
                .deliver(&format!("{} {}", icon, APP_TITLE), message);
        }

        Dispatch::Delivered(NotificationEvent {
            icon: icon.to_string(),
            message: message.to_string(),
            timestamp_ms: now_ms,
        })
    }

    /// Toasts currently on screen, after expiring finished ones
    pub fn toasts(&self) -> Vec<ToastView> {
        let mut state = self.state.lock();
        state.toasts.tick();
        state.toasts.active()
    }

    pub fn last_delivered_ms(&self) -> Option<i64> {
        self.state.lock().throttle.last_delivered_ms()
    }

    /// Wait for desktop alerts still being handed to the platform
    pub fn flush_alerts(&self) {
        self.alerts.flush();
    }
}
