//! System-level alerts via `notify-send` on Linux and `osascript` on macOS.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::process::Command;
use std::str::FromStr;
use std::thread::JoinHandle;
use which::which;

/// Whether system alerts may be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    Granted,
    Denied,
    /// Never asked
    #[default]
    Default,
}

impl std::fmt::Display for NotificationPermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl FromStr for NotificationPermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "granted" | "allow" => Ok(Self::Granted),
            "denied" | "deny" => Ok(Self::Denied),
            "default" => Ok(Self::Default),
            other => Err(format!("invalid notification permission '{}'", other)),
        }
    }
}

/// Channel for system-level alerts
///
/// Delivery is best-effort: implementations log failures and never return them.
pub trait AlertChannel: Send + Sync {
    fn deliver(&self, title: &str, body: &str);

    /// Block until every alert passed to [`deliver`](Self::deliver) has
    /// reached the platform. Must be called before the process exits.
    fn flush(&self) {}
}

type Sender = fn(&str, &str) -> Result<(), String>;

/// Desktop notifications through the platform notifier
///
/// Each alert runs on its own thread. The handles are kept until
/// [`AlertChannel::flush`] joins them.
pub struct DesktopAlert {
    send: Sender,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl DesktopAlert {
    /// Locate the platform notifier on `PATH`. `None` when it is missing.
    pub fn detect() -> Option<Self> {
        let (program, send): (&str, Sender) = if cfg!(target_os = "macos") {
            ("osascript", send_macos_notification as Sender)
        } else {
            ("notify-send", send_linux_notification as Sender)
        };

        match which(program) {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "Using desktop notifier");
                Some(Self::with_sender(send))
            }
            Err(_) => {
                tracing::debug!(program, "Desktop notifier not found in PATH");
                None
            }
        }
    }

    fn with_sender(send: Sender) -> Self {
        Self {
            send,
            pending: Mutex::new(Vec::new()),
        }
    }
}

impl AlertChannel for DesktopAlert {
    fn deliver(&self, title: &str, body: &str) {
        let title = title.to_string();
        let body = body.to_string();
        let send = self.send;
        let handle = std::thread::spawn(move || {
            if let Err(error) = send(&title, &body) {
                tracing::warn!("Desktop notification failed: {}", error);
            }
        });

        let mut pending = self.pending.lock();
        pending.retain(|handle| !handle.is_finished());
        pending.push(handle);
    }

    fn flush(&self) {
        let pending = std::mem::take(&mut *self.pending.lock());
        for handle in pending {
            if handle.join().is_err() {
                tracing::warn!("Desktop notification thread panicked");
            }
        }
    }
}

/// Drops every alert. Used when no platform notifier is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlert;

impl AlertChannel for SilentAlert {
    fn deliver(&self, title: &str, _body: &str) {
        tracing::debug!(title, "Desktop alert suppressed");
    }
}

fn send_linux_notification(title: &str, body: &str) -> Result<(), String> {
    Command::new("notify-send")
        .arg("--app-name=studybreak")
        .arg(title)
        .arg(body)
        .output()
        .map_err(|e| format!("notify-send failed: {e}"))
        .and_then(|output| {
            if output.status.success() {
                Ok(())
            } else {
                Err(format!("notify-send exited with: {}", output.status))
            }
        })
}

fn send_macos_notification(title: &str, body: &str) -> Result<(), String> {
    let script = format!(
        r#"display notification "{}" with title "{}""#,
        escape_applescript(body),
        escape_applescript(title)
    );

    Command::new("osascript")
        .arg("-e")
        .arg(&script)
        .output()
        .map_err(|e| format!("osascript failed: {e}"))
        .and_then(|output| {
            if output.status.success() {
                Ok(())
            } else {
                Err(format!("osascript exited with: {}", output.status))
            }
        })
}

fn escape_applescript(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    static SENT: AtomicUsize = AtomicUsize::new(0);

    fn slow_sender(_title: &str, _body: &str) -> Result<(), String> {
        std::thread::sleep(Duration::from_millis(50));
        SENT.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    #[test]
    fn test_flush_waits_for_pending_alerts() {
        let alert = DesktopAlert::with_sender(slow_sender);
        alert.deliver("☕ Study Break Optimizer", "Time for a short break!");
        alert.deliver("✅ Study Break Optimizer", "Preferences saved");

        alert.flush();
        assert_eq!(SENT.load(Ordering::SeqCst), 2);
        assert!(alert.pending.lock().is_empty());
    }

    #[test]
    fn test_permission_parsing() {
        assert_eq!(
            "granted".parse::<NotificationPermission>().unwrap(),
            NotificationPermission::Granted
        );
        assert_eq!(
            "deny".parse::<NotificationPermission>().unwrap(),
            NotificationPermission::Denied
        );
        assert!("maybe".parse::<NotificationPermission>().is_err());
    }

    #[test]
    fn test_permission_serializes_lowercase() {
        let json = serde_json::to_string(&NotificationPermission::Default).unwrap();
        assert_eq!(json, "\"default\"");
    }

    #[test]
    fn test_applescript_escaping() {
        assert_eq!(
            escape_applescript(r#"say "hi" \ bye"#),
            r#"say \"hi\" \\ bye"#
        );
    }
}
