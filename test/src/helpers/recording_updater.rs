use std::{collections::HashMap, sync::Mutex};

use log::debug;
use tether_binding::{MirrorHandle, RemoteUpdater, RemoteValue, WriteOptions};

/// One call received by the [`RecordingUpdater`].
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteCall {
    Splice {
        mirror: MirrorHandle,
        index: usize,
        remove_count: usize,
        insert: Option<MirrorHandle>,
    },
    Move {
        mirror: MirrorHandle,
        item: MirrorHandle,
        old_index: usize,
        new_index: usize,
    },
    Clear {
        mirror: MirrorHandle,
    },
    UpdateProperty {
        mirror: MirrorHandle,
        name: String,
        value: RemoteValue,
        options: WriteOptions,
    },
}

#[derive(Default)]
struct RemoteModel {
    arrays: HashMap<MirrorHandle, Vec<MirrorHandle>>,
    properties: HashMap<(MirrorHandle, String), RemoteValue>,
    violations: Vec<String>,
}

/// Records every remote call and keeps a model of the remote arrays and
/// properties they produce.
#[derive(Default)]
pub struct RecordingUpdater {
    calls: Mutex<Vec<RemoteCall>>,
    model: Mutex<RemoteModel>,
}

impl RecordingUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().expect("updater poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("updater poisoned").len()
    }

    /// Returns and forgets the calls recorded so far.
    pub fn take_calls(&self) -> Vec<RemoteCall> {
        std::mem::take(&mut *self.calls.lock().expect("updater poisoned"))
    }

    /// Values written to `name` on any mirror, oldest first.
    pub fn property_writes(&self, name: &str) -> Vec<RemoteValue> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RemoteCall::UpdateProperty {
                    name: written,
                    value,
                    ..
                } if written == name => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Registers the contents a remote array was created with.
    pub fn seed_array(&self, mirror: MirrorHandle, items: Vec<MirrorHandle>) {
        self.model
            .lock()
            .expect("updater poisoned")
            .arrays
            .insert(mirror, items);
    }

    pub fn remote_array(&self, mirror: MirrorHandle) -> Vec<MirrorHandle> {
        self.model
            .lock()
            .expect("updater poisoned")
            .arrays
            .get(&mirror)
            .cloned()
            .unwrap_or_default()
    }

    pub fn remote_property(&self, mirror: MirrorHandle, name: &str) -> Option<RemoteValue> {
        self.model
            .lock()
            .expect("updater poisoned")
            .properties
            .get(&(mirror, name.to_string()))
            .cloned()
    }

    /// Calls that addressed an index the remote array did not have.
    pub fn violations(&self) -> Vec<String> {
        self.model.lock().expect("updater poisoned").violations.clone()
    }

    fn record(&self, call: RemoteCall) {
        debug!("Remote call: {:?}", call);
        self.calls.lock().expect("updater poisoned").push(call);
    }
}

impl RemoteUpdater for RecordingUpdater {
    fn splice_collection(
        &self,
        mirror: &MirrorHandle,
        index: usize,
        remove_count: usize,
        insert: Option<&MirrorHandle>,
    ) {
        self.record(RemoteCall::Splice {
            mirror: *mirror,
            index,
            remove_count,
            insert: insert.copied(),
        });

        let mut model = self.model.lock().expect("updater poisoned");
        let array = model.arrays.entry(*mirror).or_default();
        if index + remove_count > array.len() || index > array.len() {
            let message = format!(
                "splice at {} removing {} on array of {}",
                index,
                remove_count,
                array.len()
            );
            model.violations.push(message);
            return;
        }
        array.drain(index..index + remove_count);
        if let Some(item) = insert {
            array.insert(index, *item);
        }
    }

    fn move_collection_item(
        &self,
        mirror: &MirrorHandle,
        item: &MirrorHandle,
        old_index: usize,
        new_index: usize,
    ) {
        self.record(RemoteCall::Move {
            mirror: *mirror,
            item: *item,
            old_index,
            new_index,
        });

        let mut model = self.model.lock().expect("updater poisoned");
        let array = model.arrays.entry(*mirror).or_default();
        if old_index >= array.len() || new_index >= array.len() || array[old_index] != *item {
            let message = format!(
                "move of #{} from {} to {} on array of {}",
                item.value(),
                old_index,
                new_index,
                array.len()
            );
            model.violations.push(message);
            return;
        }
        let moved = array.remove(old_index);
        array.insert(new_index, moved);
    }

    fn clear_all_collection(&self, mirror: &MirrorHandle) {
        self.record(RemoteCall::Clear { mirror: *mirror });
        self.model
            .lock()
            .expect("updater poisoned")
            .arrays
            .entry(*mirror)
            .or_default()
            .clear();
    }

    fn update_property(
        &self,
        mirror: &MirrorHandle,
        name: &str,
        value: RemoteValue,
        options: WriteOptions,
    ) {
        self.record(RemoteCall::UpdateProperty {
            mirror: *mirror,
            name: name.to_string(),
            value: value.clone(),
            options,
        });
        self.model
            .lock()
            .expect("updater poisoned")
            .properties
            .insert((*mirror, name.to_string()), value);
    }
}
