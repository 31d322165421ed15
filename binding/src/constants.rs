/// Remote entry point that executes a bound command.
pub const EXECUTE_ENTRY: &str = "Execute";
/// Remote entry point that evaluates a bound command's can-execute state.
pub const CAN_EXECUTE_ENTRY: &str = "CanExecute";

/// Mirror property bumped on every native can-execute change notification.
pub const CAN_EXECUTE_COUNT_PROPERTY: &str = "CanExecuteCount";
/// Mirror property holding the last evaluated can-execute result.
pub const CAN_EXECUTE_VALUE_PROPERTY: &str = "CanExecuteValue";

/// Thread name of the bundled dispatcher when none is configured.
pub const DEFAULT_DISPATCHER_THREAD_NAME: &str = "tether-dispatcher";
