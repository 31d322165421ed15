use std::{any::Any, sync::Arc};

use crate::types::NativeValue;

use super::{error::CommandError, subscription::Subscription};

pub type CanExecuteChangedHandler = Arc<dyn Fn() + Send + Sync>;

/// A native executable action.
pub trait Command: Any + Send + Sync {
    fn execute(&self, parameter: Option<NativeValue>);

    fn can_execute(&self, parameter: Option<NativeValue>) -> Result<bool, CommandError>;

    fn subscribe_can_execute_changed(&self, handler: CanExecuteChangedHandler) -> Subscription;

    fn unsubscribe_can_execute_changed(&self, subscription: Subscription);
}
