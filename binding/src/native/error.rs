use thiserror::Error;

/// Errors raised by a native [`Command`](super::Command) implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The action reported a failure while evaluating its state
    #[error("Command evaluation failed: {reason}")]
    Evaluation { reason: String },

    /// The action panicked while running `operation`
    #[error("Command panicked during {operation}")]
    Panicked { operation: &'static str },
}
