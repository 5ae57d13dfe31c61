//! Batch training with a simulated progress indicator
//!
//! The backend only reports how many episodes it ran once the whole batch is
//! done. The indicator is animated locally from that total through a
//! [`ProgressSource`], so a backend that streams real progress can replace
//! [`SimulatedProgress`] without touching the runner.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use studybreak_client::DecisionBackend;
use studybreak_config::TrainingSettings;

use crate::stats::{fetch_training_stats, TrainingStatsView};
use crate::{MonitorError, MonitorResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressFrame {
    pub completed: u32,
    pub total: u32,
    pub percent: f64,
}

/// Receives the indicator state
pub trait ProgressSink: Send + Sync {
    /// Trigger disabled, indicator shown
    fn started(&self, requested_episodes: u32);

    fn frame(&self, frame: ProgressFrame);

    /// Trigger enabled, indicator hidden. Called on success and on failure.
    fn finished(&self);
}

/// Produces progress frames for a finished batch
#[async_trait]
pub trait ProgressSource: Send + Sync {
    async fn play(&self, total_episodes: u32, sink: &dyn ProgressSink);
}

/// Walks `0..=total` with a fixed delay between frames
#[derive(Debug, Clone)]
pub struct SimulatedProgress {
    step_delay: Duration,
}

impl SimulatedProgress {
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }
}

#[async_trait]
impl ProgressSource for SimulatedProgress {
    async fn play(&self, total_episodes: u32, sink: &dyn ProgressSink) {
        if total_episodes == 0 {
            sink.frame(ProgressFrame {
                completed: 0,
                total: 0,
                percent: 100.0,
            });
            return;
        }

        for completed in 0..=total_episodes {
            if completed > 0 && !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }
            sink.frame(ProgressFrame {
                completed,
                total: total_episodes,
                percent: f64::from(completed) * 100.0 / f64::from(total_episodes),
            });
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrainingRun {
    Completed {
        total_episodes: u32,
        stats: Option<TrainingStatsView>,
    },
    /// Another run was already active
    Skipped,
}

/// RAII guard for the single-run latch
struct RunGuard<'a> {
    running: &'a AtomicBool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

pub struct TrainingRunner {
    backend: Arc<dyn DecisionBackend>,
    progress: Box<dyn ProgressSource>,
    default_episodes: u32,
    running: AtomicBool,
}

impl TrainingRunner {
    pub fn new(backend: Arc<dyn DecisionBackend>, progress: Box<dyn ProgressSource>) -> Self {
        Self {
            backend,
            progress,
            default_episodes: TrainingSettings::default().default_episodes,
            running: AtomicBool::new(false),
        }
    }

    pub fn from_settings(backend: Arc<dyn DecisionBackend>, settings: &TrainingSettings) -> Self {
        let progress = SimulatedProgress::new(Duration::from_millis(settings.step_delay_ms));
        Self {
            default_episodes: settings.default_episodes,
            ..Self::new(backend, Box::new(progress))
        }
    }

    pub fn default_episodes(&self) -> u32 {
        self.default_episodes
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn try_acquire(&self) -> Option<RunGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RunGuard {
                running: &self.running,
            })
    }

    /// Train for `episodes` and animate the result.
    ///
    /// While a run is active further calls return [`TrainingRun::Skipped`]
    /// without contacting the backend.
    pub async fn run(&self, episodes: u32, sink: &dyn ProgressSink) -> MonitorResult<TrainingRun> {
        let Some(_guard) = self.try_acquire() else {
            tracing::debug!("Training already running, ignoring request");
            return Ok(TrainingRun::Skipped);
        };

        sink.started(episodes);

        let response = match self.backend.train(episodes).await {
            Ok(response) => response,
            Err(error) => {
                sink.finished();
                return Err(MonitorError::Training(error));
            }
        };

        self.progress.play(response.total_episodes, sink).await;
        sink.finished();

        let stats = fetch_training_stats(self.backend.as_ref()).await;
        Ok(TrainingRun::Completed {
            total_episodes: response.total_episodes,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        frames: Mutex<Vec<ProgressFrame>>,
    }

    impl ProgressSink for RecordingSink {
        fn started(&self, _requested_episodes: u32) {}

        fn frame(&self, frame: ProgressFrame) {
            self.frames.lock().push(frame);
        }

        fn finished(&self) {}
    }

    #[tokio::test]
    async fn test_simulated_progress_walks_every_episode() {
        let sink = RecordingSink::default();
        SimulatedProgress::new(Duration::ZERO).play(4, &sink).await;

        let frames = sink.frames.lock();
        assert_eq!(frames.len(), 5);
        assert_eq!(frames[0].percent, 0.0);
        assert_eq!(frames[2].percent, 50.0);
        assert_eq!(frames[4].completed, 4);
        assert_eq!(frames[4].percent, 100.0);
    }

    #[tokio::test]
    async fn test_zero_total_renders_single_full_frame() {
        let sink = RecordingSink::default();
        SimulatedProgress::new(Duration::ZERO).play(0, &sink).await;

        let frames = sink.frames.lock();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].percent, 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_delay_paces_frames() {
        let sink = RecordingSink::default();
        let start = tokio::time::Instant::now();
        SimulatedProgress::new(Duration::from_millis(10))
            .play(3, &sink)
            .await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
