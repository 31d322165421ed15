use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use log::{debug, warn};

use crate::{
    convert::{ConversionError, Converter},
    diff::{ChangeKind, CollectionDiff, RawCollectionChange},
    listener::ChangeListener,
    native::{NativeCollection, NativeCollectionChange},
    types::ElementType,
    update::{DeferredUpdate, RemoteUpdater, UpdateBatch},
};

use super::{
    build::BuildInstruction,
    description::DescriptionBuilder,
    error::GlueError,
    node::{GlueRef, MirrorCell},
};

/// Keeps an ordered native collection in step with its remote array.
///
/// Local requests (`request_*`) mutate the shadow list immediately and hand
/// back the remote half as a [`DeferredUpdate`]. The caller applies those in
/// the order they were produced; the node does not sequence them.
pub struct ArrayGlue {
    collection: Arc<dyn NativeCollection>,
    items: RwLock<Vec<GlueRef>>,
    element_type: ElementType,
    mirror: MirrorCell,
    replaying: AtomicBool,
}

impl ArrayGlue {
    pub(crate) fn new(
        items: impl IntoIterator<Item = GlueRef>,
        collection: Arc<dyn NativeCollection>,
        element_type: ElementType,
        mirror: MirrorCell,
    ) -> Self {
        Self {
            collection,
            items: RwLock::new(items.into_iter().collect()),
            element_type,
            mirror,
            replaying: AtomicBool::new(false),
        }
    }

    pub fn collection(&self) -> &dyn NativeCollection {
        self.collection.as_ref()
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn len(&self) -> usize {
        self.read_items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_items().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<GlueRef> {
        self.read_items().get(index).cloned()
    }

    pub fn children(&self) -> Vec<GlueRef> {
        self.read_items().clone()
    }

    // reads tolerate poisoning, writes refuse it
    fn read_items(&self) -> RwLockReadGuard<'_, Vec<GlueRef>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_items(&self) -> Result<RwLockWriteGuard<'_, Vec<GlueRef>>, GlueError> {
        self.items.write().map_err(|_| GlueError::LockPoisoned)
    }

    pub fn build_instruction(&self) -> BuildInstruction {
        BuildInstruction::Array {
            items: self.children(),
        }
    }

    // Remote -> native

    /// Converts a raw change batch from the remote side into a diff whose
    /// values are nodes of this collection's element type.
    pub fn compute_diff(
        &self,
        changes: &[RawCollectionChange],
        converter: &dyn Converter,
    ) -> Result<CollectionDiff, ConversionError> {
        CollectionDiff::from_raw(changes, converter, &self.element_type)
    }

    /// Replays `diff` in order onto the native collection and the shadow
    /// list together.
    ///
    /// Every index is checked against the length the collection will have
    /// when its entry is reached before anything is touched, so a bad diff
    /// leaves both sides unchanged. Read-only native collections ignore
    /// remote edits. Native notifications raised by the replay itself are
    /// echoes of the remote edit and are dropped by
    /// [`request_update`](Self::request_update).
    pub fn apply_remote_diff(&self, diff: &CollectionDiff) -> Result<(), GlueError> {
        let Some(list) = self.collection.as_list() else {
            debug!(
                "Ignoring {} remote edits on read-only collection of {}",
                diff.len(),
                self.element_type
            );
            return Ok(());
        };

        diff.validate(self.write_items()?.len())?;
        let _replay = ReplayGuard::enter(&self.replaying);

        // native calls run without the shadow lock held: the collection's
        // subscribers may read this node while being notified
        for entry in diff.entries() {
            let native = entry.value.native_value().clone();
            match entry.kind {
                ChangeKind::Add => {
                    let appended = {
                        let mut items = self.write_items()?;
                        let appended = entry.index == items.len();
                        items.insert(entry.index, entry.value.clone());
                        appended
                    };
                    if appended {
                        list.push(native);
                    } else {
                        list.insert(entry.index, native);
                    }
                }
                ChangeKind::Remove => {
                    self.write_items()?.remove(entry.index);
                    list.remove_at(entry.index);
                }
            }
        }

        Ok(())
    }

    // Native -> remote

    pub fn request_insert(&self, node: GlueRef, index: usize) -> Result<DeferredUpdate, GlueError> {
        let mut items = self.write_items()?;
        check_insert_index(index, items.len())?;
        items.insert(index, node.clone());

        let mirror = self.mirror.clone();
        Ok(DeferredUpdate::new(move |updater| {
            splice(updater, &mirror, index, 0, Some(&node));
        }))
    }

    pub fn request_replace(&self, node: GlueRef, index: usize) -> Result<DeferredUpdate, GlueError> {
        let mut items = self.write_items()?;
        check_index("replace", index, items.len())?;
        items[index] = node.clone();

        let mirror = self.mirror.clone();
        Ok(DeferredUpdate::new(move |updater| {
            splice(updater, &mirror, index, 1, Some(&node));
        }))
    }

    /// Moves an element within the shadow list. The remote side moves the
    /// element's existing mirror rather than recreating it.
    pub fn request_move(&self, old_index: usize, new_index: usize) -> Result<DeferredUpdate, GlueError> {
        let mut items = self.write_items()?;
        check_index("move from", old_index, items.len())?;
        check_index("move to", new_index, items.len())?;
        let node = items.remove(old_index);
        items.insert(new_index, node.clone());

        let mirror = self.mirror.clone();
        Ok(DeferredUpdate::new(move |updater| {
            let Some(target) = mirror.handle() else {
                debug!("Array has no mirror yet, skipping move");
                return;
            };
            let Some(item) = node.mirror_handle() else {
                warn!("Moved element at {} has no mirror, skipping move", old_index);
                return;
            };
            updater.move_collection_item(&target, &item, old_index, new_index);
        }))
    }

    pub fn request_remove(&self, index: usize) -> Result<DeferredUpdate, GlueError> {
        let mut items = self.write_items()?;
        check_index("remove", index, items.len())?;
        items.remove(index);

        let mirror = self.mirror.clone();
        Ok(DeferredUpdate::new(move |updater| {
            splice(updater, &mirror, index, 1, None);
        }))
    }

    pub fn request_reset(&self) -> Result<DeferredUpdate, GlueError> {
        self.write_items()?.clear();

        let mirror = self.mirror.clone();
        Ok(DeferredUpdate::new(move |updater| {
            let Some(target) = mirror.handle() else {
                debug!("Array has no mirror yet, skipping clear");
                return;
            };
            updater.clear_all_collection(&target);
        }))
    }

    /// Maps a change already made to the native collection onto the matching
    /// request. A reset clears both sides, then re-adds whatever the native
    /// collection holds now.
    pub fn request_update(
        &self,
        change: &NativeCollectionChange,
        converter: &dyn Converter,
    ) -> Result<DeferredUpdate, GlueError> {
        if self.replaying.load(Ordering::Acquire) {
            debug!("Dropping native echo of a remote edit: {:?}", change);
            return Ok(DeferredUpdate::noop());
        }
        match change {
            NativeCollectionChange::Add { index, value } => {
                let node = converter.native_to_glue(value)?;
                self.request_insert(node, *index)
            }
            NativeCollectionChange::Remove { index } => self.request_remove(*index),
            NativeCollectionChange::Replace { index, value } => {
                let node = converter.native_to_glue(value)?;
                self.request_replace(node, *index)
            }
            NativeCollectionChange::Move {
                old_index,
                new_index,
            } => self.request_move(*old_index, *new_index),
            NativeCollectionChange::Reset => {
                // convert first so a failure leaves the shadow list intact
                let nodes = (0..self.collection.len())
                    .filter_map(|index| self.collection.get(index))
                    .map(|value| converter.native_to_glue(&value))
                    .collect::<Result<Vec<_>, _>>()?;

                let mut batch = UpdateBatch::new();
                batch.push(self.request_reset()?);
                for (index, node) in nodes.into_iter().enumerate() {
                    batch.push(self.request_insert(node, index)?);
                }
                Ok(DeferredUpdate::new(move |updater| batch.apply(Some(updater))))
            }
        }
    }

    // Graph

    pub fn describe(&self, ctx: &mut DescriptionBuilder) {
        let items = self.children();
        ctx.append("[");
        for (index, item) in items.iter().enumerate() {
            if index != 0 {
                ctx.append(",");
            }
            ctx.with_index(index, |ctx| item.describe(ctx));
        }
        ctx.append("]");
    }

    pub fn notify_if_observable(&self, node: &GlueRef, listener: &mut dyn ChangeListener) {
        if let Some(source) = self.collection.observable() {
            listener.on_collection_source(node, source);
        }
    }
}

fn check_index(operation: &'static str, index: usize, len: usize) -> Result<(), GlueError> {
    if index < len {
        return Ok(());
    }
    Err(GlueError::IndexOutOfBounds {
        operation,
        index,
        len,
    })
}

// inserting at the end is allowed
fn check_insert_index(index: usize, len: usize) -> Result<(), GlueError> {
    check_index("insert", index, len + 1).map_err(|_| GlueError::IndexOutOfBounds {
        operation: "insert",
        index,
        len,
    })
}

/// Marks a remote replay in progress for as long as it lives.
struct ReplayGuard<'a>(&'a AtomicBool);

impl<'a> ReplayGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for ReplayGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn splice(
    updater: &dyn RemoteUpdater,
    mirror: &MirrorCell,
    index: usize,
    remove_count: usize,
    item: Option<&GlueRef>,
) {
    let Some(target) = mirror.handle() else {
        debug!("Array has no mirror yet, skipping splice at {}", index);
        return;
    };
    match item {
        Some(item) => {
            let Some(handle) = item.mirror_handle() else {
                warn!("Spliced element at {} has no mirror, skipping splice", index);
                return;
            };
            updater.splice_collection(&target, index, remove_count, Some(&handle));
        }
        None => updater.splice_collection(&target, index, remove_count, None),
    }
}
