//! # Tether Binding
//! Keeps a graph of native values in step with mirror objects living in a
//! remote runtime.
//!
//! Every native value is wrapped in a [`GlueNode`]. Local edits produce
//! [`DeferredUpdate`]s that are applied to the remote side on the session's
//! queue; remote edits arrive as [`CollectionDiff`]s and are replayed onto the
//! native values. Commands are bridged in both directions through
//! [`CommandGlue`].

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

mod config;
mod constants;
mod convert;
mod diff;
mod dispatch;
mod glue;
mod listener;
mod native;
mod session;
mod types;
mod update;

pub use config::{BindingConfig, DispatcherConfig, FailurePolicy};
pub use constants::{
    CAN_EXECUTE_COUNT_PROPERTY, CAN_EXECUTE_ENTRY, CAN_EXECUTE_VALUE_PROPERTY,
    DEFAULT_DISPATCHER_THREAD_NAME, EXECUTE_ENTRY,
};
pub use convert::{ConversionError, Converter};
pub use diff::{ChangeKind, CollectionDiff, DiffEntry, RawCollectionChange};
pub use dispatch::{DispatchError, DispatchTask, Dispatcher, Evaluation, EvaluationFuture};
pub use glue::{
    ArrayGlue, BuildInstruction, CanExecuteOutcome, CommandGlue, CommandLifecycle,
    DescriptionBuilder, GlueError, GlueKind, GlueNode, GlueRef, GlueVariant, MirrorBuilder,
    ObjectGlue, PrimitiveGlue, PrimitiveValue,
};
pub use listener::{notify_graph, ChangeListener, ChangeRelay, SourceCollector};
pub use native::{
    CanExecuteChangedHandler, CollectionChangedHandler, Command, CommandError, NativeCollection,
    NativeCollectionChange, NativeList, NativeObject, ObservableCollection, ObservableObject,
    PropertyChangedHandler, Subscription,
};
pub use session::{RemoteCallback, RemoteSession, SessionContext, SessionTask};
pub use types::{
    ElementType, MirrorBinding, MirrorHandle, NativeValue, RemoteValue, SessionId, WriteOptions,
};
pub use update::{DeferredUpdate, RemoteUpdater, UpdateBatch};

cfg_if! {
    if #[cfg(feature = "thread_dispatcher")] {
        pub use dispatch::ThreadDispatcher;
    }
}
