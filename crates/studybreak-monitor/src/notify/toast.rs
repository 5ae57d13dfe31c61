//! In-terminal toasts
//!
//! A toast fades in, stays visible, fades out, then disappears. The board keeps
//! the three most recent ones.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use studybreak_config::NotificationSettings;

const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    FadingIn,
    Visible,
    FadingOut,
    Gone,
}

/// Fade and visibility durations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTiming {
    /// Time from creation until the fade-out starts
    pub visible: Duration,
    /// Length of each fade
    pub fade: Duration,
}

impl ToastTiming {
    pub fn from_settings(settings: &NotificationSettings) -> Self {
        Self {
            visible: Duration::from_millis(settings.toast_visible_ms),
            fade: Duration::from_millis(settings.toast_fade_ms),
        }
    }

    pub fn phase_at(&self, elapsed: Duration) -> ToastPhase {
        if elapsed < self.fade.min(self.visible) {
            ToastPhase::FadingIn
        } else if elapsed < self.visible {
            ToastPhase::Visible
        } else if elapsed < self.visible + self.fade {
            ToastPhase::FadingOut
        } else {
            ToastPhase::Gone
        }
    }

    /// Total lifetime of a toast
    pub fn lifetime(&self) -> Duration {
        self.visible + self.fade
    }
}

impl Default for ToastTiming {
    fn default() -> Self {
        Self::from_settings(&NotificationSettings::default())
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub icon: String,
    pub message: String,
    created_at: Instant,
}

impl Toast {
    pub fn new(icon: impl Into<String>, message: impl Into<String>, created_at: Instant) -> Self {
        Self {
            icon: icon.into(),
            message: message.into(),
            created_at,
        }
    }
}

/// A toast as it should be drawn right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub icon: String,
    pub message: String,
    pub phase: ToastPhase,
}

#[derive(Debug)]
pub struct ToastBoard {
    toasts: VecDeque<Toast>,
    timing: ToastTiming,
}

impl ToastBoard {
    pub fn new(timing: ToastTiming) -> Self {
        Self {
            toasts: VecDeque::new(),
            timing,
        }
    }

    pub fn show(&mut self, icon: &str, message: &str) {
        self.show_at(icon, message, Instant::now());
    }

    pub fn show_at(&mut self, icon: &str, message: &str, now: Instant) {
        self.toasts.push_back(Toast::new(icon, message, now));
        while self.toasts.len() > MAX_VISIBLE {
            self.toasts.pop_front();
        }
    }

    /// Drop toasts that have finished fading out
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        let timing = self.timing;
        self.toasts.retain(|toast| {
            timing.phase_at(now.saturating_duration_since(toast.created_at)) != ToastPhase::Gone
        });
    }

    pub fn active(&self) -> Vec<ToastView> {
        self.active_at(Instant::now())
    }

    /// Toasts still on screen at `now`, oldest first
    pub fn active_at(&self, now: Instant) -> Vec<ToastView> {
        self.toasts
            .iter()
            .filter_map(|toast| {
                let phase = self
                    .timing
                    .phase_at(now.saturating_duration_since(toast.created_at));
                (phase != ToastPhase::Gone).then(|| ToastView {
                    icon: toast.icon.clone(),
                    message: toast.message.clone(),
                    phase,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Default for ToastBoard {
    fn default() -> Self {
        Self::new(ToastTiming::default())
    }
}
