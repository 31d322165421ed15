use std::fmt;

use super::remote_updater::RemoteUpdater;

type UpdateFn = Box<dyn FnOnce(Option<&dyn RemoteUpdater>) + Send>;

/// A remote mutation that has been decided but not yet performed.
///
/// The local effect of the request that produced it has already happened.
/// Applying consumes the value, so it runs at most once; applying with no
/// updater does nothing.
#[must_use = "a DeferredUpdate does nothing until it is applied"]
pub struct DeferredUpdate {
    inner: Option<UpdateFn>,
}

impl DeferredUpdate {
    pub fn new<F>(update: F) -> Self
    where
        F: FnOnce(&dyn RemoteUpdater) + Send + 'static,
    {
        Self {
            inner: Some(Box::new(move |updater: Option<&dyn RemoteUpdater>| {
                if let Some(updater) = updater {
                    update(updater);
                }
            })),
        }
    }

    /// An update with no remote effect.
    pub fn noop() -> Self {
        Self { inner: None }
    }

    pub fn is_noop(&self) -> bool {
        self.inner.is_none()
    }

    pub fn apply(self, updater: Option<&dyn RemoteUpdater>) {
        if let Some(update) = self.inner {
            update(updater);
        }
    }
}

impl fmt::Debug for DeferredUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredUpdate")
            .field("noop", &self.is_noop())
            .finish()
    }
}

/// Deferred updates collected so they reach the remote side in one pass,
/// in the order they were pushed.
#[derive(Debug, Default)]
#[must_use = "an UpdateBatch does nothing until it is applied"]
pub struct UpdateBatch {
    updates: Vec<DeferredUpdate>,
}

impl UpdateBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, update: DeferredUpdate) {
        if !update.is_noop() {
            self.updates.push(update);
        }
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn apply(self, updater: Option<&dyn RemoteUpdater>) {
        for update in self.updates {
            update.apply(updater);
        }
    }
}

impl Extend<DeferredUpdate> for UpdateBatch {
    fn extend<I: IntoIterator<Item = DeferredUpdate>>(&mut self, iter: I) {
        for update in iter {
            self.push(update);
        }
    }
}

impl FromIterator<DeferredUpdate> for UpdateBatch {
    fn from_iter<I: IntoIterator<Item = DeferredUpdate>>(iter: I) -> Self {
        let mut batch = Self::new();
        batch.extend(iter);
        batch
    }
}
