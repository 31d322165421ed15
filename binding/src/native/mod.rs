//! Contracts the native side must satisfy to be wrapped by glue nodes.
//!
//! Nothing here knows about the remote session. Implementations are supplied
//! by the host application; the `tether-test` crate ships in-memory fakes.

mod collection;
mod command;
mod error;
mod object;
mod subscription;

pub use collection::{
    CollectionChangedHandler, NativeCollection, NativeCollectionChange, NativeList,
    ObservableCollection,
};
pub use command::{CanExecuteChangedHandler, Command};
pub use error::CommandError;
pub use object::{NativeObject, ObservableObject, PropertyChangedHandler};
pub use subscription::Subscription;
