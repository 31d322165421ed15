/// Assert that an array node's shadow list holds exactly the native list's
/// values, same allocations, same order.
#[macro_export]
macro_rules! assert_shadow_matches {
    ($node:expr, $list:expr) => {{
        let children = $node.children();
        let natives = $list.snapshot();
        assert_eq!(
            children.len(),
            natives.len(),
            "Shadow list length should match the native collection"
        );
        for (index, (child, native)) in children.iter().zip(natives.iter()).enumerate() {
            assert!(
                child.wraps(native),
                "Shadow node at {} should wrap the native value at the same index",
                index
            );
        }
    }};
}

/// Assert that the remote model of an array mirrors its shadow list.
#[macro_export]
macro_rules! assert_remote_matches {
    ($harness:expr, $node:expr) => {{
        let remote = $harness.updater.remote_array($harness.handle(&$node));
        assert_eq!(
            remote,
            $harness.shadow_handles(&$node),
            "Remote array should hold the shadow list's mirrors in order"
        );
        assert!(
            $harness.updater.violations().is_empty(),
            "Remote calls should address valid indices: {:?}",
            $harness.updater.violations()
        );
    }};
}
