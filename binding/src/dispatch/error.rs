use thiserror::Error;

/// Errors that can occur when handing work to a [`Dispatcher`](super::Dispatcher)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The dispatcher no longer accepts work
    #[error("Dispatcher is shut down")]
    ShutDown,

    /// The dispatcher dropped an evaluation before producing its result
    #[error("Dispatcher dropped the evaluation before it completed")]
    EvaluationDropped,
}
