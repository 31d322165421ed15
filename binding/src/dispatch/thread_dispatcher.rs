use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    thread::{self, JoinHandle},
};

use log::{debug, info, warn};
use tokio::sync::{mpsc, oneshot};

use crate::config::DispatcherConfig;

use super::{
    dispatcher::{DispatchTask, Dispatcher, Evaluation, EvaluationFuture},
    error::DispatchError,
};

/// A [`Dispatcher`] that owns one dedicated thread and runs every task on it,
/// in submission order.
///
/// For hosts without their own UI loop. A task that panics is logged and the
/// thread keeps serving.
pub struct ThreadDispatcher {
    sender: Option<mpsc::UnboundedSender<DispatchTask>>,
    thread: Option<JoinHandle<()>>,
}

impl ThreadDispatcher {
    pub fn spawn(config: &DispatcherConfig) -> std::io::Result<Self> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<DispatchTask>();
        let thread_name = config.thread_name.clone();

        let thread = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || {
                info!("Dispatcher thread {} started", thread_name);
                while let Some(task) = receiver.blocking_recv() {
                    if catch_unwind(AssertUnwindSafe(task)).is_err() {
                        warn!("Task panicked on dispatcher thread {}", thread_name);
                    }
                }
                info!("Dispatcher thread {} stopped", thread_name);
            })?;

        Ok(Self {
            sender: Some(sender),
            thread: Some(thread),
        })
    }

    fn submit(&self, task: DispatchTask) -> Result<(), DispatchError> {
        let Some(sender) = &self.sender else {
            return Err(DispatchError::ShutDown);
        };
        sender.send(task).map_err(|_| DispatchError::ShutDown)
    }
}

impl Dispatcher for ThreadDispatcher {
    fn run_async(&self, task: DispatchTask) {
        if let Err(err) = self.submit(task) {
            warn!("Dropping dispatched task: {}", err);
        }
    }

    fn evaluate_async(&self, evaluation: Evaluation) -> EvaluationFuture {
        let (result_sender, result_receiver) = oneshot::channel();
        let submitted = self.submit(Box::new(move || {
            // receiver gone means the caller stopped waiting
            let _ = result_sender.send(evaluation());
        }));

        Box::pin(async move {
            submitted?;
            result_receiver
                .await
                .map_err(|_| DispatchError::EvaluationDropped)
        })
    }
}

impl Drop for ThreadDispatcher {
    fn drop(&mut self) {
        // closing the channel ends the thread's loop
        self.sender.take();
        if let Some(thread) = self.thread.take() {
            if thread.thread().id() == thread::current().id() {
                // last reference released by one of our own tasks; the loop
                // exits once that task returns
                debug!("Dispatcher dropped on its own thread, not joining");
                return;
            }
            if thread.join().is_err() {
                warn!("Dispatcher thread terminated abnormally");
            }
        }
    }
}
