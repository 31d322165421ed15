mod dispatcher;
mod error;

pub use dispatcher::{DispatchTask, Dispatcher, Evaluation, EvaluationFuture};
pub use error::DispatchError;

cfg_if! {
    if #[cfg(feature = "thread_dispatcher")] {
        mod thread_dispatcher;
        pub use thread_dispatcher::ThreadDispatcher;
    }
}
