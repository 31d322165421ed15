use crate::constants::DEFAULT_DISPATCHER_THREAD_NAME;

/// What a failed can-execute evaluation resolves to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Treat the command as executable.
    #[default]
    Open,
    /// Treat the command as not executable.
    Closed,
}

impl FailurePolicy {
    pub fn fallback(&self) -> bool {
        match self {
            FailurePolicy::Open => true,
            FailurePolicy::Closed => false,
        }
    }
}

/// Tuning knobs cloned into every [`SessionContext`](crate::SessionContext).
#[derive(Clone, Debug, Default)]
pub struct BindingConfig {
    /// Substituted whenever a command's can-execute evaluation fails, both at
    /// construction and on remote request.
    pub can_execute_failure: FailurePolicy,
}

impl BindingConfig {
    pub fn fail_closed() -> Self {
        Self {
            can_execute_failure: FailurePolicy::Closed,
        }
    }
}

/// Settings for the bundled [`ThreadDispatcher`](crate::ThreadDispatcher).
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    pub thread_name: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_DISPATCHER_THREAD_NAME.to_string(),
        }
    }
}
