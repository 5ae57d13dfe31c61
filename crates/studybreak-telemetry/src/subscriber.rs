use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Forwards WARN and ERROR events to a channel so an interactive screen can
/// print them between frames instead of writing over them.
pub struct ChannelLayer {
    tx: UnboundedSender<String>,
}

impl ChannelLayer {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    fields: Vec<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }
}

impl<S> tracing_subscriber::Layer<S> for ChannelLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !matches!(*metadata.level(), Level::WARN | Level::ERROR) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let message = visitor
            .message
            .unwrap_or_else(|| "(no message)".to_string());

        let mut formatted = format!("{} {}: {}", metadata.level(), metadata.target(), message);
        if !visitor.fields.is_empty() {
            formatted.push_str(" (");
            formatted.push_str(&visitor.fields.join(", "));
            formatted.push(')');
        }

        let _ = self.tx.send(formatted);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub json_output: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json_output: false,
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

fn build_filter(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the stderr subscriber used by one-shot commands.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_subscriber(config: &TelemetryConfig) {
    let filter = build_filter(config);

    if config.json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Install a subscriber that only forwards WARN/ERROR lines to the returned
/// receiver. Used by the interactive monitor.
pub fn init_channel_subscriber(config: &TelemetryConfig) -> UnboundedReceiver<String> {
    let filter = build_filter(config);
    let (tx, rx) = unbounded_channel();

    tracing_subscriber::registry()
        .with(filter)
        .with(ChannelLayer::new(tx))
        .init();

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.level, "warn");
        assert!(!config.json_output);
    }

    #[test]
    fn test_config_from_json() {
        let config: TelemetryConfig =
            serde_json::from_str(r#"{"level": "debug", "json_output": true}"#).unwrap();
        assert_eq!(config.level, "debug");
        assert!(config.json_output);
    }

    #[test]
    fn test_channel_layer_forwards_warnings_only() {
        let (tx, mut rx) = unbounded_channel();
        let subscriber = tracing_subscriber::registry().with(ChannelLayer::new(tx));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("not forwarded");
            tracing::warn!(endpoint = "status", "refresh failed");
        });

        let line = rx.try_recv().unwrap();
        assert!(line.starts_with("WARN"));
        assert!(line.contains("refresh failed"));
        assert!(line.contains("endpoint=status"));
        assert!(rx.try_recv().is_err());
    }
}
