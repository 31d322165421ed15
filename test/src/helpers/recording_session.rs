use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use tether_binding::{MirrorHandle, RemoteCallback, RemoteSession, RemoteValue, SessionTask};

/// When [`RecordingSession`] runs the tasks handed to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionMode {
    /// Run each task as soon as it is queued.
    Inline,
    /// Hold tasks until [`RecordingSession::run_pending`].
    Queued,
}

/// In-process stand-in for a remote session.
pub struct RecordingSession {
    mode: SessionMode,
    queue: Mutex<VecDeque<SessionTask>>,
    bindings: Mutex<HashMap<(MirrorHandle, String), RemoteCallback>>,
}

impl RecordingSession {
    pub fn new(mode: SessionMode) -> Self {
        Self {
            mode,
            queue: Mutex::new(VecDeque::new()),
            bindings: Mutex::new(HashMap::new()),
        }
    }

    pub fn inline() -> Self {
        Self::new(SessionMode::Inline)
    }

    pub fn queued() -> Self {
        Self::new(SessionMode::Queued)
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().expect("session poisoned").len()
    }

    /// Runs queued tasks in order, including tasks queued while running.
    /// Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.queue.lock().expect("session poisoned").pop_front();
            let Some(task) = task else {
                return ran;
            };
            task();
            ran += 1;
        }
    }

    /// Entry point names bound on `mirror`, sorted.
    pub fn bound_names(&self, mirror: MirrorHandle) -> Vec<String> {
        let mut names: Vec<String> = self
            .bindings
            .lock()
            .expect("session poisoned")
            .keys()
            .filter(|(handle, _)| *handle == mirror)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Calls the entry point `name` of `mirror` as the remote side would.
    /// False when nothing is bound there.
    pub fn invoke(&self, mirror: MirrorHandle, name: &str, args: Vec<RemoteValue>) -> bool {
        let callback = self
            .bindings
            .lock()
            .expect("session poisoned")
            .get(&(mirror, name.to_string()))
            .cloned();
        match callback {
            Some(callback) => {
                callback(args);
                true
            }
            None => false,
        }
    }
}

impl RemoteSession for RecordingSession {
    fn run_async(&self, task: SessionTask) {
        match self.mode {
            SessionMode::Inline => task(),
            SessionMode::Queued => self.queue.lock().expect("session poisoned").push_back(task),
        }
    }

    fn bind(&self, mirror: &MirrorHandle, name: &str, callback: RemoteCallback) {
        self.bindings
            .lock()
            .expect("session poisoned")
            .insert((*mirror, name.to_string()), callback);
    }
}
