use proptest::prelude::*;
use tola_listdiff::*;

// =============================================================================
// Helpers
// =============================================================================

/// A mirrored list slot: the item it holds, or a placeholder from an insert.
#[derive(Debug, Clone, PartialEq)]
struct Slot<T> {
    item: Option<T>,
    changed: bool,
}

/// Apply `ops` to a copy of `old` with real splice semantics.
fn replay<T: Clone, P>(old: &[T], ops: &[UpdateOp<P>]) -> Vec<Slot<T>> {
    let mut slots: Vec<Slot<T>> = old
        .iter()
        .map(|item| Slot {
            item: Some(item.clone()),
            changed: false,
        })
        .collect();

    for op in ops {
        op.apply_to(&mut slots, || Slot {
            item: None,
            changed: false,
        });
        if let UpdateOp::Changed { position, count, .. } = op {
            for slot in &mut slots[*position..*position + *count] {
                slot.changed = true;
            }
        }
    }
    slots
}

/// Replay and check the mirror now matches `new` under `same_item`.
fn assert_round_trip<T, P>(
    old: &[T],
    new: &[T],
    ops: &[UpdateOp<P>],
    same_item: impl Fn(&T, &T) -> bool,
) -> Vec<Slot<T>>
where
    T: Clone + std::fmt::Debug,
    P: std::fmt::Debug,
{
    let slots = replay(old, ops);
    assert_eq!(slots.len(), new.len(), "length mismatch after {ops:?}");
    for (index, (slot, expected)) in slots.iter().zip(new).enumerate() {
        if let Some(item) = &slot.item {
            assert!(
                same_item(item, expected),
                "slot {index}: {item:?} != {expected:?} after {ops:?}"
            );
        }
    }
    slots
}

/// Route library logs to the test harness, filtered by `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn ops_for<T: PartialEq>(old: &[T], new: &[T], detect_moves: bool) -> Vec<UpdateOp<()>> {
    init_tracing();
    let source = SliceSource::new(old, new);
    calculate_diff_with_moves(&source, detect_moves)
        .unwrap()
        .updates()
        .unwrap()
}

fn counts<P>(ops: &[UpdateOp<P>]) -> (usize, usize, usize, usize) {
    let mut inserted = 0;
    let mut removed = 0;
    let mut moved = 0;
    let mut changed = 0;
    for op in ops {
        match op {
            UpdateOp::Inserted { .. } => inserted += 1,
            UpdateOp::Removed { .. } => removed += 1,
            UpdateOp::Moved { .. } => moved += 1,
            UpdateOp::Changed { .. } => changed += 1,
        }
    }
    (inserted, removed, moved, changed)
}

#[derive(Debug, Clone, PartialEq)]
struct Row {
    id: u8,
    version: u8,
}

fn rows(ids: &[u8], versions: &[u8]) -> Vec<Row> {
    ids.iter()
        .map(|&id| Row {
            id,
            version: versions[id as usize],
        })
        .collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_edge_shapes_round_trip() {
    let empty: [char; 0] = [];
    let abc = ['a', 'b', 'c'];
    let xyz = ['x', 'y', 'z'];
    for detect_moves in [true, false] {
        for (old, new) in [
            (&empty[..], &empty[..]),
            (&empty[..], &abc[..]),
            (&abc[..], &empty[..]),
            (&abc[..], &abc[..]),
            (&abc[..], &xyz[..]),
        ] {
            let ops = ops_for(old, new, detect_moves);
            assert_round_trip(old, new, &ops, |a, b| a == b);
        }
    }
}

#[test]
fn test_disjoint_lists_remove_then_insert() {
    let old = ['a', 'b', 'c'];
    let new = ['x', 'y'];
    for detect_moves in [true, false] {
        let ops = ops_for(&old, &new, detect_moves);
        assert_eq!(
            ops,
            vec![
                UpdateOp::Removed { position: 0, count: 3 },
                UpdateOp::Inserted { position: 0, count: 2 },
            ]
        );
    }
}

#[test]
fn test_self_diff_is_empty() {
    let seq = [3, 1, 4, 1, 5, 9, 2, 6];
    assert!(ops_for(&seq, &seq, true).is_empty());
    assert!(ops_for(&seq, &seq, false).is_empty());
}

#[test]
fn test_swap_move_vs_no_move() {
    let old = ["a", "b", "c"];
    let new = ["b", "a", "c"];

    let ops = ops_for(&old, &new, true);
    assert_eq!(counts(&ops), (0, 0, 1, 0));
    assert_round_trip(&old, &new, &ops, |a, b| a == b);

    let ops = ops_for(&old, &new, false);
    assert_eq!(counts(&ops), (1, 1, 0, 0));
    assert_round_trip(&old, &new, &ops, |a, b| a == b);
}

#[test]
fn test_pure_move_to_end() {
    let ops = ops_for(&[1, 2, 3, 4, 5], &[1, 3, 4, 5, 2], true);
    assert_eq!(ops, vec![UpdateOp::Moved { from: 1, to: 4 }]);
}

#[test]
fn test_append_and_remove_front() {
    assert_eq!(
        ops_for(&["A", "B"], &["A", "B", "C"], true),
        vec![UpdateOp::Inserted { position: 2, count: 1 }]
    );
    assert_eq!(
        ops_for(&["A", "B"], &["B"], true),
        vec![UpdateOp::Removed { position: 0, count: 1 }]
    );
}

#[test]
fn test_repeated_run_collapses_to_one_item() {
    let old = [0u8, 1, 2, 3, 4, 5, 6, 0, 1, 2, 3];
    let new = [3u8];
    for detect_moves in [true, false] {
        let ops = ops_for(&old, &new, detect_moves);
        let slots = assert_round_trip(&old, &new, &ops, |a, b| a == b);
        assert_eq!(slots[0].item, Some(3));
    }
}

#[test]
fn test_change_in_place_with_payload() {
    let old = rows(&[0, 1, 2], &[0, 0, 0]);
    let new = rows(&[0, 1, 2], &[0, 7, 0]);
    let source = KeyedSource::new(&old, &new, |row: &Row| row.id)
        .with_payload(|o, n| Some((old[o].version, new[n].version)));

    let ops = calculate_diff(&source).unwrap().updates().unwrap();
    assert_eq!(
        ops,
        vec![UpdateOp::Changed { position: 1, count: 1, payload: Some((0, 7)) }]
    );
}

#[test]
fn test_adjacent_changes_batch() {
    let old = rows(&[0, 1, 2, 3], &[0, 0, 0, 0]);
    let new = rows(&[0, 1, 2, 3], &[0, 1, 1, 1]);
    let source = KeyedSource::new(&old, &new, |row: &Row| row.id);

    let ops = calculate_diff(&source).unwrap().updates().unwrap();
    assert_eq!(
        ops,
        vec![UpdateOp::Changed { position: 1, count: 3, payload: None }]
    );
}

#[test]
fn test_reverse_is_all_moves() {
    let old: Vec<u8> = (0..6).collect();
    let new: Vec<u8> = (0..6).rev().collect();
    let ops = ops_for(&old, &new, true);
    let (inserted, removed, moved, _) = counts(&ops);
    assert_eq!((inserted, removed), (0, 0));
    assert_eq!(moved, 5);
    assert_round_trip(&old, &new, &ops, |a, b| a == b);
}

#[test]
fn test_stats_agree_with_events() {
    let old = ["a", "b", "c", "d", "e"];
    let new = ["e", "b", "x", "c", "a"];
    init_tracing();
    let source = SliceSource::new(&old, &new);
    let result = calculate_diff(&source).unwrap();
    let stats = result.stats();

    let slots = assert_round_trip(&old, &new, &result.updates().unwrap(), |a, b| a == b);
    let placeholders = slots.iter().filter(|slot| slot.item.is_none()).count();
    assert_eq!(placeholders, stats.inserted);
    assert_eq!(stats.inserted, 1);
    assert_eq!(stats.removed, 1);
    assert_eq!(stats.kept + stats.moved, 4);
}

#[test]
fn test_dispatch_into_custom_sink() {
    #[derive(Default)]
    struct Mirror {
        len: usize,
        events: usize,
    }

    impl ListUpdateSink<()> for Mirror {
        fn on_inserted(&mut self, _position: usize, count: usize) {
            self.len += count;
            self.events += 1;
        }
        fn on_removed(&mut self, _position: usize, count: usize) {
            self.len -= count;
            self.events += 1;
        }
        fn on_moved(&mut self, _from: usize, _to: usize) {
            self.events += 1;
        }
        fn on_changed(&mut self, _position: usize, _count: usize, _payload: Option<()>) {
            self.events += 1;
        }
    }

    let old = "kitten".chars().collect::<Vec<_>>();
    let new = "sitting".chars().collect::<Vec<_>>();
    let source = SliceSource::new(&old, &new);
    let result = calculate_diff(&source).unwrap();

    // dispatchable repeatedly against fresh sinks
    for _ in 0..2 {
        let mut mirror = Mirror {
            len: old.len(),
            ..Mirror::default()
        };
        result.dispatch_updates_to(&mut mirror).unwrap();
        assert_eq!(mirror.len, new.len());
        assert!(mirror.events > 0);
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn test_round_trip_with_duplicates(
        old in prop::collection::vec(0u8..5, 0..16),
        new in prop::collection::vec(0u8..5, 0..16),
        detect_moves in any::<bool>(),
    ) {
        let source = SliceSource::new(&old, &new);
        let result = calculate_diff_with_moves(&source, detect_moves).unwrap();
        let ops = result.updates().unwrap();

        let slots = assert_round_trip(&old, &new, &ops, |a, b| a == b);
        let placeholders = slots.iter().filter(|slot| slot.item.is_none()).count();
        prop_assert_eq!(placeholders, result.stats().inserted);
        if !detect_moves {
            prop_assert!(ops.iter().all(|op| !op.is_move()));
        }
    }

    #[test]
    fn test_round_trip_keyed_with_changes(
        old_ids in prop::collection::btree_set(0u8..20, 0..12)
            .prop_map(|ids| ids.into_iter().collect::<Vec<_>>())
            .prop_shuffle(),
        new_ids in prop::collection::btree_set(0u8..20, 0..12)
            .prop_map(|ids| ids.into_iter().collect::<Vec<_>>())
            .prop_shuffle(),
        old_versions in prop::collection::vec(0u8..2, 20),
        new_versions in prop::collection::vec(0u8..2, 20),
    ) {
        let old = rows(&old_ids, &old_versions);
        let new = rows(&new_ids, &new_versions);
        let source = KeyedSource::new(&old, &new, |row: &Row| row.id);
        let ops = calculate_diff(&source).unwrap().updates().unwrap();

        let slots = assert_round_trip(&old, &new, &ops, |a, b| a.id == b.id);
        for (slot, expected) in slots.iter().zip(&new) {
            if let Some(row) = &slot.item {
                // every surviving row is either untouched or flagged changed
                prop_assert_eq!(row.version != expected.version, slot.changed);
            }
        }
    }

    #[test]
    fn test_event_count_is_linear(
        old in prop::collection::vec(0u8..8, 0..32),
        new in prop::collection::vec(0u8..8, 0..32),
    ) {
        let ops = ops_for(&old, &new, true);
        prop_assert!(ops.len() <= old.len() + new.len());
    }
}
