use std::{future::Future, pin::Pin};

use super::error::DispatchError;

pub type DispatchTask = Box<dyn FnOnce() + Send>;
pub type Evaluation = Box<dyn FnOnce() -> bool + Send>;
pub type EvaluationFuture = Pin<Box<dyn Future<Output = Result<bool, DispatchError>> + Send>>;

/// The single UI-affine execution context shared by the command nodes of a
/// session.
pub trait Dispatcher: Send + Sync {
    /// Runs `task` on the dispatcher without waiting for it.
    fn run_async(&self, task: DispatchTask);

    /// Runs `evaluation` on the dispatcher; the returned future resolves with
    /// its result. Evaluations are never cancelled once submitted.
    fn evaluate_async(&self, evaluation: Evaluation) -> EvaluationFuture;
}
