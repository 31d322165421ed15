use std::sync::Mutex;

use tether_binding::{DispatchError, DispatchTask, Dispatcher, Evaluation, EvaluationFuture};
use tokio::sync::oneshot;

/// Runs everything immediately on the calling thread.
#[derive(Default)]
pub struct InlineDispatcher;

impl Dispatcher for InlineDispatcher {
    fn run_async(&self, task: DispatchTask) {
        task();
    }

    fn evaluate_async(&self, evaluation: Evaluation) -> EvaluationFuture {
        let value = evaluation();
        Box::pin(async move { Ok(value) })
    }
}

type PendingEvaluation = (Evaluation, oneshot::Sender<bool>);

/// Holds evaluations until released, to control what happens while a
/// can-execute request is in flight. Tasks run immediately.
#[derive(Default)]
pub struct GatedDispatcher {
    pending: Mutex<Vec<PendingEvaluation>>,
}

impl GatedDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().expect("dispatcher poisoned").len()
    }

    /// Yields to the runtime until `count` evaluations are waiting.
    pub async fn wait_for_pending(&self, count: usize) {
        while self.pending_count() < count {
            tokio::task::yield_now().await;
        }
    }

    /// Runs every held evaluation and delivers its result.
    pub fn release_all(&self) -> usize {
        let pending = std::mem::take(&mut *self.pending.lock().expect("dispatcher poisoned"));
        let released = pending.len();
        for (evaluation, result) in pending {
            let _ = result.send(evaluation());
        }
        released
    }

    /// Drops every held evaluation without running it.
    pub fn abandon_all(&self) -> usize {
        let pending = std::mem::take(&mut *self.pending.lock().expect("dispatcher poisoned"));
        pending.len()
    }
}

impl Dispatcher for GatedDispatcher {
    fn run_async(&self, task: DispatchTask) {
        task();
    }

    fn evaluate_async(&self, evaluation: Evaluation) -> EvaluationFuture {
        let (sender, receiver) = oneshot::channel();
        self.pending
            .lock()
            .expect("dispatcher poisoned")
            .push((evaluation, sender));
        Box::pin(async move {
            receiver
                .await
                .map_err(|_| DispatchError::EvaluationDropped)
        })
    }
}
