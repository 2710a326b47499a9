//! Cloneable async handle around one engine.
//!
//! All operations serialise on a single mutex, so a decide and the
//! feedback for an earlier record never interleave mid-update. After
//! [`SharedAttune::shutdown`] new fuse/decide calls are refused while
//! feedback for outstanding records is still accepted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use attune_adaptation::ModelMetrics;
use attune_fusion::MoodTrends;
use attune_learning::FeedbackReceipt;
use attune_types::{ChannelReading, Context, Feedback, MoodState, RecordId};
use tokio::sync::Mutex;
use tracing::info;

use crate::engine::{AttuneEngine, Decision};
use crate::error::{AttuneError, AttuneResult};

#[derive(Clone)]
pub struct SharedAttune {
    engine: Arc<Mutex<AttuneEngine>>,
    shutting_down: Arc<AtomicBool>,
}

impl SharedAttune {
    pub fn new(engine: AttuneEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            shutting_down: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn fuse(&self, readings: &[ChannelReading]) -> AttuneResult<MoodState> {
        self.ensure_running()?;
        Ok(self.engine.lock().await.fuse(readings))
    }

    pub async fn decide(&self, context: &Context) -> AttuneResult<Decision> {
        self.ensure_running()?;
        Ok(self.engine.lock().await.decide(context))
    }

    pub async fn apply_feedback(&self, record_id: &RecordId, feedback: Feedback) -> FeedbackReceipt {
        self.engine.lock().await.apply_feedback(record_id, feedback)
    }

    pub async fn current_mood(&self) -> MoodState {
        self.engine.lock().await.current_mood()
    }

    pub async fn mood_trends(&self) -> Option<MoodTrends> {
        self.engine.lock().await.mood_trends()
    }

    pub async fn evaluate_model(&self) -> ModelMetrics {
        self.engine.lock().await.evaluate_model()
    }

    pub async fn reset(&self) {
        self.engine.lock().await.reset();
    }

    /// Run `f` with exclusive access to the engine.
    pub async fn with_engine<R>(&self, f: impl FnOnce(&mut AttuneEngine) -> R) -> R {
        let mut engine = self.engine.lock().await;
        f(&mut engine)
    }

    /// Refuse new cycles from now on. Idempotent.
    pub fn shutdown(&self) {
        if !self.shutting_down.swap(true, Ordering::SeqCst) {
            info!("Attune engine shutting down");
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    fn ensure_running(&self) -> AttuneResult<()> {
        if self.is_shutting_down() {
            Err(AttuneError::ShuttingDown)
        } else {
            Ok(())
        }
    }
}
