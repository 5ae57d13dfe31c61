use serde::{Deserialize, Serialize};
use studybreak_telemetry::TelemetryConfig;

/// Main studybreak configuration
///
/// Configuration is loaded from (in priority order):
/// 1. `studybreak.jsonc` - JSON with comments
/// 2. `studybreak.json` - Standard JSON
/// 3. `studybreak.yml` / `studybreak.yaml` - YAML format
///
/// Also checks hidden variants (`.studybreak.*`) and `~/.config/studybreak/` for global config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudybreakConfig {
    /// Decision service connection
    #[serde(default)]
    pub server: ServerSettings,

    /// Throttle and toast timings
    #[serde(default)]
    pub notifications: NotificationSettings,

    /// Training progress animation
    #[serde(default)]
    pub training: TrainingSettings,

    /// Log level and format
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Decision service settings
///
/// # Example
///
/// ```yaml
/// server:
///   base_url: http://127.0.0.1:5000
///   timeout_secs: 30
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Base URL, without the `/api` suffix (default: http://127.0.0.1:5000)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds. Unset leaves the transport default in place.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

// ============================================================================
// Notification Configuration
// ============================================================================

/// Notification timings
///
/// # Example
///
/// ```yaml
/// notifications:
///   throttle_ms: 5000
///   toast_visible_ms: 4000
///   toast_fade_ms: 300
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Minimum gap between two delivered notifications (default: 5000)
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,

    /// How long a toast stays fully visible (default: 4000)
    #[serde(default = "default_toast_visible_ms")]
    pub toast_visible_ms: u64,

    /// Fade in/out duration of a toast (default: 300)
    #[serde(default = "default_toast_fade_ms")]
    pub toast_fade_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle_ms(),
            toast_visible_ms: default_toast_visible_ms(),
            toast_fade_ms: default_toast_fade_ms(),
        }
    }
}

fn default_throttle_ms() -> u64 {
    5000
}

fn default_toast_visible_ms() -> u64 {
    4000
}

fn default_toast_fade_ms() -> u64 {
    300
}

// ============================================================================
// Training Configuration
// ============================================================================

/// Training progress settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSettings {
    /// Delay between two animated progress frames (default: 10)
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,

    /// Episodes requested when none are given (default: 100)
    #[serde(default = "default_episodes")]
    pub default_episodes: u32,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            step_delay_ms: default_step_delay_ms(),
            default_episodes: default_episodes(),
        }
    }
}

fn default_step_delay_ms() -> u64 {
    10
}

fn default_episodes() -> u32 {
    100
}
