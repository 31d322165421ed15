mod deferred_update;
mod remote_updater;

pub use deferred_update::{DeferredUpdate, UpdateBatch};
pub use remote_updater::RemoteUpdater;
