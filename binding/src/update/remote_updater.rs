use crate::types::{MirrorHandle, RemoteValue, WriteOptions};

/// Applies structural patches to objects living in the remote session.
///
/// Owned by the remote runtime. Every caller in this crate tolerates the
/// updater being absent, which is how a torn-down session is represented.
pub trait RemoteUpdater: Send + Sync {
    /// Removes `remove_count` elements at `index`, then inserts `insert` there.
    fn splice_collection(
        &self,
        mirror: &MirrorHandle,
        index: usize,
        remove_count: usize,
        insert: Option<&MirrorHandle>,
    );

    /// Moves the existing remote `item` without recreating it.
    fn move_collection_item(
        &self,
        mirror: &MirrorHandle,
        item: &MirrorHandle,
        old_index: usize,
        new_index: usize,
    );

    fn clear_all_collection(&self, mirror: &MirrorHandle);

    fn update_property(
        &self,
        mirror: &MirrorHandle,
        name: &str,
        value: RemoteValue,
        options: WriteOptions,
    );
}
