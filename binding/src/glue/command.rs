use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc, Mutex, MutexGuard, PoisonError, Weak,
    },
};

use log::{debug, warn};

use crate::{
    config::FailurePolicy,
    constants::{
        CAN_EXECUTE_COUNT_PROPERTY, CAN_EXECUTE_ENTRY, CAN_EXECUTE_VALUE_PROPERTY, EXECUTE_ENTRY,
    },
    convert::Converter,
    dispatch::DispatchError,
    listener::ChangeListener,
    native::{Command, CommandError, Subscription},
    session::SessionContext,
    types::{MirrorBinding, MirrorHandle, NativeValue, RemoteValue, WriteOptions},
};

use super::{
    build::BuildInstruction,
    description::DescriptionBuilder,
    error::GlueError,
    node::{GlueRef, MirrorCell},
};

/// Where a command node is in its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandLifecycle {
    Unbound,
    Bound,
    Listening,
    Unlistening,
}

impl CommandLifecycle {
    pub fn name(&self) -> &'static str {
        match self {
            CommandLifecycle::Unbound => "Unbound",
            CommandLifecycle::Bound => "Bound",
            CommandLifecycle::Listening => "Listening",
            CommandLifecycle::Unlistening => "Unlistening",
        }
    }
}

/// Result of a remote can-execute request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanExecuteOutcome {
    /// The value was queued for writing on the mirror.
    Scheduled { value: bool },
    /// The session went away while the evaluation was pending.
    SessionClosed,
    /// The node has no mirror to write to.
    Unmirrored,
}

/// Version signal alternating between 1 and 2.
///
/// Written to the mirror instead of the boolean so that two notifications
/// with the same underlying value still read as a change remotely.
struct ToggleCounter(AtomicU8);

impl ToggleCounter {
    fn new() -> Self {
        Self(AtomicU8::new(1))
    }

    fn get(&self) -> u8 {
        self.0.load(Ordering::Acquire)
    }

    fn flip(&self) -> u8 {
        // 1 ^ 3 == 2, 2 ^ 3 == 1
        self.0.fetch_xor(0b11, Ordering::AcqRel) ^ 0b11
    }
}

struct ListenState {
    lifecycle: CommandLifecycle,
    subscription: Option<Subscription>,
}

struct CommandInner {
    context: SessionContext,
    converter: Arc<dyn Converter>,
    command: Arc<dyn Command>,
    initial_can_execute: bool,
    toggle: ToggleCounter,
    mirror: MirrorCell,
    state: Mutex<ListenState>,
}

/// Bridges a native [`Command`] with a remote invocable object.
///
/// Cheap to clone; clones share state. Callbacks handed to the session and
/// to the native command hold weak references, so dropping the graph
/// releases the node.
#[derive(Clone)]
pub struct CommandGlue {
    inner: Arc<CommandInner>,
}

impl CommandGlue {
    pub(crate) fn new(
        context: &SessionContext,
        converter: Arc<dyn Converter>,
        command: Arc<dyn Command>,
        mirror: MirrorCell,
    ) -> Self {
        let initial_can_execute =
            evaluate_can_execute(command.as_ref(), None, context.config().can_execute_failure);

        Self {
            inner: Arc::new(CommandInner {
                context: context.clone(),
                converter,
                command,
                initial_can_execute,
                toggle: ToggleCounter::new(),
                mirror,
                state: Mutex::new(ListenState {
                    lifecycle: CommandLifecycle::Unbound,
                    subscription: None,
                }),
            }),
        }
    }

    fn from_weak(inner: &Weak<CommandInner>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    pub fn command(&self) -> &Arc<dyn Command> {
        &self.inner.command
    }

    pub fn initial_can_execute(&self) -> bool {
        self.inner.initial_can_execute
    }

    pub fn toggle_count(&self) -> u8 {
        self.inner.toggle.get()
    }

    pub fn lifecycle(&self) -> CommandLifecycle {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .lifecycle
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, ListenState>, GlueError> {
        self.inner.state.lock().map_err(|_| GlueError::LockPoisoned)
    }

    pub fn build_instruction(&self) -> BuildInstruction {
        BuildInstruction::Command {
            can_execute: self.inner.initial_can_execute,
        }
    }

    /// Records the mirror and registers the `Execute` and `CanExecute` entry
    /// points on it. The mirror is only recorded while the lifecycle lock is
    /// held, so a failure here leaves the node unmirrored.
    pub(crate) fn bind(&self, binding: MirrorBinding) -> Result<(), GlueError> {
        let handle = binding.handle;
        {
            let mut state = self.lock_state()?;
            self.inner.mirror.set(binding)?;
            if state.lifecycle != CommandLifecycle::Unbound {
                return Err(GlueError::InvalidCommandTransition {
                    from_state: state.lifecycle.name(),
                    operation: "be bound",
                });
            }
            state.lifecycle = CommandLifecycle::Bound;
        }

        let Some(session) = self.inner.context.live_session() else {
            debug!("Session closed before command entry points were bound");
            return Ok(());
        };

        let weak = Arc::downgrade(&self.inner);
        session.bind(
            &handle,
            EXECUTE_ENTRY,
            Arc::new(move |args: Vec<RemoteValue>| {
                if let Some(glue) = Self::from_weak(&weak) {
                    glue.on_remote_execute_invoked(&args);
                }
            }),
        );

        let weak = Arc::downgrade(&self.inner);
        session.bind(
            &handle,
            CAN_EXECUTE_ENTRY,
            Arc::new(move |args: Vec<RemoteValue>| {
                if let Some(glue) = Self::from_weak(&weak) {
                    glue.spawn_can_execute(args);
                }
            }),
        );

        Ok(())
    }

    // Native change notifications

    pub fn start_listening(&self) -> Result<(), GlueError> {
        let mut state = self.lock_state()?;
        match state.lifecycle {
            CommandLifecycle::Bound => {}
            CommandLifecycle::Listening => return Ok(()),
            other => {
                return Err(GlueError::InvalidCommandTransition {
                    from_state: other.name(),
                    operation: "start listening",
                })
            }
        }

        let weak = Arc::downgrade(&self.inner);
        let subscription = self
            .inner
            .command
            .subscribe_can_execute_changed(Arc::new(move || {
                if let Some(glue) = Self::from_weak(&weak) {
                    glue.on_native_can_execute_changed();
                }
            }));

        state.subscription = Some(subscription);
        state.lifecycle = CommandLifecycle::Listening;
        Ok(())
    }

    pub fn stop_listening(&self) -> Result<(), GlueError> {
        let mut state = self.lock_state()?;
        if state.lifecycle != CommandLifecycle::Listening {
            debug!(
                "Command is {}, nothing to stop listening to",
                state.lifecycle.name()
            );
            return Ok(());
        }
        if let Some(subscription) = state.subscription.take() {
            self.inner
                .command
                .unsubscribe_can_execute_changed(subscription);
        }
        state.lifecycle = CommandLifecycle::Unlistening;
        Ok(())
    }

    /// Bumps the toggle counter and pushes it to the mirror. Returns the new
    /// counter value.
    pub fn on_native_can_execute_changed(&self) -> u8 {
        let count = self.inner.toggle.flip();
        if !self.schedule_write(CAN_EXECUTE_COUNT_PROPERTY, RemoteValue::Int(count.into())) {
            debug!("Can-execute change not forwarded: no live mirror");
        }
        count
    }

    // Remote invocations

    /// Runs the command on the dispatcher without waiting for it.
    pub fn on_remote_execute_invoked(&self, args: &[RemoteValue]) {
        let parameter = self.inner.converter.first_argument_or_none(args);
        let command = self.inner.command.clone();
        self.inner
            .context
            .dispatcher()
            .run_async(Box::new(move || command.execute(parameter)));
    }

    /// Evaluates the command on the dispatcher, then writes the result to
    /// the mirror if the session survived the wait.
    pub async fn on_remote_can_execute_invoked(
        &self,
        args: &[RemoteValue],
    ) -> Result<CanExecuteOutcome, DispatchError> {
        let parameter = self.inner.converter.first_argument_or_none(args);
        let liveness = self.inner.context.liveness();

        // stage 1: evaluate on the UI-affine dispatcher
        let command = self.inner.command.clone();
        let policy = self.inner.context.config().can_execute_failure;
        let value = self
            .inner
            .context
            .dispatcher()
            .evaluate_async(Box::new(move || {
                evaluate_can_execute(command.as_ref(), parameter, policy)
            }))
            .await?;

        // stage 2: write only if the session is still there
        if liveness.is_cancelled() {
            debug!("Session closed during can-execute evaluation, dropping result");
            return Ok(CanExecuteOutcome::SessionClosed);
        }
        if !self.schedule_write(CAN_EXECUTE_VALUE_PROPERTY, RemoteValue::Bool(value)) {
            return Ok(CanExecuteOutcome::Unmirrored);
        }
        Ok(CanExecuteOutcome::Scheduled { value })
    }

    fn spawn_can_execute(&self, args: Vec<RemoteValue>) {
        let glue = self.clone();
        self.inner.context.runtime().spawn(async move {
            if let Err(err) = glue.on_remote_can_execute_invoked(&args).await {
                warn!("Remote can-execute request failed: {}", err);
            }
        });
    }

    /// Queues a property write on the session. False when there is no live
    /// session or no mirror.
    fn schedule_write(&self, name: &'static str, value: RemoteValue) -> bool {
        let context = &self.inner.context;
        let Some(session) = context.live_session() else {
            return false;
        };
        let Some(handle) = self.inner.mirror.handle() else {
            return false;
        };

        let updater = context.shared_updater();
        let liveness = context.liveness();
        session.run_async(Box::new(move || {
            if liveness.is_cancelled() {
                return;
            }
            updater.update_property(&handle, name, value, WriteOptions::read_only());
        }));
        true
    }

    // Graph

    pub fn describe(&self, ctx: &mut DescriptionBuilder) {
        ctx.append("{}");
    }

    pub fn notify_if_observable(&self, node: &GlueRef, listener: &mut dyn ChangeListener) {
        listener.on_command_source(node, self);
    }
}

/// Runs `can_execute`, turning errors and panics into the policy's fallback.
fn evaluate_can_execute(
    command: &dyn Command,
    parameter: Option<NativeValue>,
    policy: FailurePolicy,
) -> bool {
    let result = catch_unwind(AssertUnwindSafe(|| command.can_execute(parameter)))
        .unwrap_or(Err(CommandError::Panicked {
            operation: "can_execute",
        }));

    match result {
        Ok(value) => value,
        Err(err) => {
            warn!("{}, falling back to {}", err, policy.fallback());
            policy.fallback()
        }
    }
}
