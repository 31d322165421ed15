/// PROPERTY-BASED TESTS: remote diff replay
///
/// Replaying k add/remove entries whose indices are valid when reached
/// leaves n + adds - removes items, identical on the native and shadow side.
/// A diff with any invalid entry changes nothing.

use std::sync::Arc;

use proptest::prelude::*;
use tether_binding::{
    ChangeKind, CollectionDiff, GlueError, GlueRef, NativeValue, RawCollectionChange, RemoteValue,
};
use tether_test::{assert_shadow_matches, int, TestHarness, TestList};

#[derive(Clone, Debug)]
struct RawEdit {
    add: bool,
    index: usize,
    value: i64,
}

fn raw_edit_strategy() -> impl Strategy<Value = RawEdit> {
    (any::<bool>(), any::<usize>(), -50i64..50)
        .prop_map(|(add, index, value)| RawEdit { add, index, value })
}

/// Turns raw edits into changes whose indices are valid against a list of
/// `len` items, along with the expected final contents.
fn valid_changes(initial: &[i64], edits: &[RawEdit]) -> (Vec<RawCollectionChange>, Vec<i64>) {
    let mut model = initial.to_vec();
    let mut changes = Vec::new();
    for edit in edits {
        if edit.add || model.is_empty() {
            let index = edit.index % (model.len() + 1);
            model.insert(index, edit.value);
            changes.push(RawCollectionChange::add(index, RemoteValue::Int(edit.value)));
        } else {
            let index = edit.index % model.len();
            let removed = model.remove(index);
            changes.push(RawCollectionChange::remove(index, RemoteValue::Int(removed)));
        }
    }
    (changes, model)
}

fn wrap_list(harness: &TestHarness, values: &[i64]) -> (Arc<TestList>, GlueRef) {
    let list = TestList::of_ints(values);
    let native: NativeValue = list.clone();
    (list, harness.wrap(native))
}

proptest! {
    /// Valid diffs replay exactly, on both sides, without echoing back
    #[test]
    fn prop_valid_diff_replays_exactly(
        initial in prop::collection::vec(-50i64..50, 0..8),
        edits in prop::collection::vec(raw_edit_strategy(), 0..32),
    ) {
        let harness = TestHarness::new();
        let (list, node) = wrap_list(&harness, &initial);
        let _relay = harness.relay(&node);
        let array = node.as_array().unwrap();

        let (changes, expected) = valid_changes(&initial, &edits);
        let diff = array.compute_diff(&changes, harness.converter.as_ref()).unwrap();
        let adds = diff.count(ChangeKind::Add);
        let removes = diff.count(ChangeKind::Remove);

        prop_assert_eq!(diff.validate(initial.len()), Ok(expected.len()));
        prop_assert!(array.apply_remote_diff(&diff).is_ok());

        prop_assert_eq!(array.len(), initial.len() + adds - removes);
        prop_assert_eq!(list.ints(), expected);
        assert_shadow_matches!(node, list);
        prop_assert_eq!(harness.updater.call_count(), 0);
    }

    /// Appending one out-of-range entry makes the whole diff a no-op
    #[test]
    fn prop_invalid_diff_changes_nothing(
        initial in prop::collection::vec(-50i64..50, 0..8),
        edits in prop::collection::vec(raw_edit_strategy(), 0..16),
        overshoot in 1usize..5,
    ) {
        let harness = TestHarness::new();
        let (list, node) = wrap_list(&harness, &initial);
        let array = node.as_array().unwrap();

        let (mut changes, expected) = valid_changes(&initial, &edits);
        changes.push(RawCollectionChange::add(
            expected.len() + overshoot,
            RemoteValue::Int(0),
        ));
        let diff = array.compute_diff(&changes, harness.converter.as_ref()).unwrap();

        prop_assert_eq!(
            array.apply_remote_diff(&diff),
            Err(GlueError::ProtocolViolation {
                operation: "add",
                index: expected.len() + overshoot,
                len: expected.len(),
            })
        );
        prop_assert_eq!(list.ints(), initial);
        assert_shadow_matches!(node, list);
    }
}

#[test]
fn hand_built_diff_replays_in_order() {
    let harness = TestHarness::new();
    let (list, node) = wrap_list(&harness, &[1, 2, 3]);
    let array = node.as_array().unwrap();

    let mut diff = CollectionDiff::new();
    diff.remove(1, array.get(1).unwrap())
        .add(0, harness.wrap(int(9)));
    array.apply_remote_diff(&diff).unwrap();

    assert_eq!(list.ints(), vec![9, 1, 3]);
    assert_shadow_matches!(node, list);
}
