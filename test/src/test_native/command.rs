use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use tether_binding::{
    CanExecuteChangedHandler, Command, CommandError, NativeValue, Subscription,
};

use super::registry::HandlerRegistry;

/// How [`TestCommand::can_execute`](Command::can_execute) answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanExecuteBehavior {
    Value(bool),
    Fail,
    Panic,
}

/// Command recording its executions.
pub struct TestCommand {
    behavior: Mutex<CanExecuteBehavior>,
    executions: Mutex<Vec<Option<NativeValue>>>,
    evaluations: AtomicUsize,
    handlers: HandlerRegistry<CanExecuteChangedHandler>,
}

impl TestCommand {
    pub fn with_behavior(behavior: CanExecuteBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior: Mutex::new(behavior),
            executions: Mutex::new(Vec::new()),
            evaluations: AtomicUsize::new(0),
            handlers: HandlerRegistry::new(),
        })
    }

    pub fn new(can_execute: bool) -> Arc<Self> {
        Self::with_behavior(CanExecuteBehavior::Value(can_execute))
    }

    pub fn failing() -> Arc<Self> {
        Self::with_behavior(CanExecuteBehavior::Fail)
    }

    pub fn panicking() -> Arc<Self> {
        Self::with_behavior(CanExecuteBehavior::Panic)
    }

    pub fn set_behavior(&self, behavior: CanExecuteBehavior) {
        *self.behavior.lock().expect("command poisoned") = behavior;
    }

    /// Changes the answer and raises the change notification.
    pub fn set_can_execute(&self, can_execute: bool) {
        self.set_behavior(CanExecuteBehavior::Value(can_execute));
        self.fire_can_execute_changed();
    }

    pub fn fire_can_execute_changed(&self) {
        for handler in self.handlers.snapshot() {
            handler();
        }
    }

    pub fn execution_count(&self) -> usize {
        self.executions.lock().expect("command poisoned").len()
    }

    pub fn executions(&self) -> Vec<Option<NativeValue>> {
        self.executions.lock().expect("command poisoned").clone()
    }

    pub fn evaluation_count(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Command for TestCommand {
    fn execute(&self, parameter: Option<NativeValue>) {
        self.executions
            .lock()
            .expect("command poisoned")
            .push(parameter);
    }

    fn can_execute(&self, _: Option<NativeValue>) -> Result<bool, CommandError> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        let behavior = *self.behavior.lock().expect("command poisoned");
        match behavior {
            CanExecuteBehavior::Value(value) => Ok(value),
            CanExecuteBehavior::Fail => Err(CommandError::Evaluation {
                reason: "test command configured to fail".to_string(),
            }),
            CanExecuteBehavior::Panic => panic!("test command configured to panic"),
        }
    }

    fn subscribe_can_execute_changed(&self, handler: CanExecuteChangedHandler) -> Subscription {
        self.handlers.subscribe(handler)
    }

    fn unsubscribe_can_execute_changed(&self, subscription: Subscription) {
        self.handlers.unsubscribe(subscription);
    }
}
