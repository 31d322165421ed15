use std::sync::Arc;

use log::debug;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::{
    config::BindingConfig,
    dispatch::Dispatcher,
    types::{MirrorHandle, RemoteValue},
    update::{DeferredUpdate, RemoteUpdater, UpdateBatch},
};

pub type SessionTask = Box<dyn FnOnce() + Send>;
pub type RemoteCallback = Arc<dyn Fn(Vec<RemoteValue>) + Send + Sync>;

/// The live connection to the remote runtime.
pub trait RemoteSession: Send + Sync {
    /// Runs `task` on the session's thread-affine queue.
    fn run_async(&self, task: SessionTask);

    /// Exposes `callback` on the mirror object under `name`, so the remote
    /// side can invoke it.
    fn bind(&self, mirror: &MirrorHandle, name: &str, callback: RemoteCallback);
}

/// Everything a node needs to reach the remote side of one session.
///
/// Cheap to clone. Once [`teardown`](Self::teardown) is called every clone
/// reports the session as gone and remote effects become no-ops.
#[derive(Clone)]
pub struct SessionContext {
    session: Arc<dyn RemoteSession>,
    updater: Arc<dyn RemoteUpdater>,
    dispatcher: Arc<dyn Dispatcher>,
    runtime: Handle,
    liveness: CancellationToken,
    config: BindingConfig,
}

impl SessionContext {
    pub fn new(
        session: Arc<dyn RemoteSession>,
        updater: Arc<dyn RemoteUpdater>,
        dispatcher: Arc<dyn Dispatcher>,
        runtime: Handle,
    ) -> Self {
        Self {
            session,
            updater,
            dispatcher,
            runtime,
            liveness: CancellationToken::new(),
            config: BindingConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BindingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &dyn Dispatcher {
        self.dispatcher.as_ref()
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    pub fn is_alive(&self) -> bool {
        !self.liveness.is_cancelled()
    }

    pub fn live_session(&self) -> Option<&dyn RemoteSession> {
        if self.is_alive() {
            Some(self.session.as_ref())
        } else {
            None
        }
    }

    /// The updater, or `None` once the session is gone.
    pub fn remote_updater(&self) -> Option<&dyn RemoteUpdater> {
        if self.is_alive() {
            Some(self.updater.as_ref())
        } else {
            None
        }
    }

    pub(crate) fn shared_updater(&self) -> Arc<dyn RemoteUpdater> {
        self.updater.clone()
    }

    /// A token cancelled when the session is torn down.
    pub fn liveness(&self) -> CancellationToken {
        self.liveness.clone()
    }

    pub fn teardown(&self) {
        if self.is_alive() {
            debug!("Remote session torn down");
        }
        self.liveness.cancel();
    }

    pub fn apply(&self, update: DeferredUpdate) {
        update.apply(self.remote_updater());
    }

    pub fn apply_batch(&self, batch: UpdateBatch) {
        batch.apply(self.remote_updater());
    }
}
