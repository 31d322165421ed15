
pub use helpers::*;
pub use test_native::{
    as_int, int, text, CanExecuteBehavior, HandlerRegistry, TestCommand, TestList, TestObject,
};

/// Routes `log` output to the test harness, once per process.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
