use std::{any::Any, sync::Arc};

use crate::types::NativeValue;

use super::subscription::Subscription;

pub type PropertyChangedHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// A native object wrapped by an object glue node.
pub trait NativeObject: Any + Send + Sync {
    /// Current value of a property, read after a change notification.
    fn property(&self, name: &str) -> Option<NativeValue>;

    /// Property-change capability, if the object has one.
    fn observable(&self) -> Option<&dyn ObservableObject> {
        None
    }
}

/// Native source of property change notifications.
pub trait ObservableObject: Send + Sync {
    fn subscribe(&self, handler: PropertyChangedHandler) -> Subscription;
    fn unsubscribe(&self, subscription: Subscription);
}
