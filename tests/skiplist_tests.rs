// Skip List: insert, search, lower bound and remove.
//
// Note: files in tests/ are integration tests; they see the crate as an
// external consumer. No need for #[cfg(test)] or inner mod.

use skiplist_engine::{Error, Options, SkipList};

fn ten_nodes() -> SkipList<String> {
    let mut sl = SkipList::with_seed(0xdead_beef);
    for key in 10..20u32 {
        sl.insert(key, format!("test-{key}"));
    }
    sl
}

// =============================================================================
// Test 1: Insert one key and get it back
// =============================================================================
#[test]
fn insert_one_key_get_it_back() {
    let mut sl = SkipList::with_seed(1);
    sl.insert(1000, "abcde");
    assert_eq!(sl.get(1000), Some(&"abcde"));
    assert_eq!(sl.len(), 1);
    assert!(sl.validate().is_ok());
}

// =============================================================================
// Test 2: Out-of-order inserts come out sorted
// =============================================================================
#[test]
fn insert_out_of_order_stays_sorted() {
    let mut sl = SkipList::with_seed(2);
    for key in [50u32, 10, 40, 20, 30] {
        sl.insert(key, key);
    }
    assert_eq!(sl.keys_at_level(0), vec![10, 20, 30, 40, 50]);
    assert_eq!(sl.first().unwrap().key(), 10);
    assert_eq!(sl.last().unwrap().key(), 50);
    assert!(sl.validate().is_ok());
}

// =============================================================================
// Test 3: Duplicate key overwrites in place
// =============================================================================
// The second insert replaces the value without adding a node.
#[test]
fn insert_duplicate_key_overwrites() {
    let mut sl = SkipList::with_seed(3);
    assert_eq!(sl.insert(7, "old"), None);
    let level = sl.get_node(7).unwrap().level();

    assert_eq!(sl.insert(7, "new"), Some("old"));
    assert_eq!(sl.get(7), Some(&"new"));
    assert_eq!(sl.len(), 1);
    assert_eq!(sl.get_node(7).unwrap().level(), level);
}

// =============================================================================
// Test 4: Search, remove, search again
// =============================================================================
#[test]
fn search_then_remove_ten_nodes() {
    let mut sl = ten_nodes();
    assert_eq!(sl.len(), 10);
    assert_eq!(sl.get(15).map(String::as_str), Some("test-15"));

    let removed = sl.remove(15).unwrap();
    assert_eq!(removed.key(), 15);
    assert_eq!(removed.value(), "test-15");

    assert_eq!(sl.len(), 9);
    assert_eq!(sl.get(15), None);
    assert!(sl.validate().is_ok());
}

// =============================================================================
// Test 5: Empty list behavior
// =============================================================================
#[test]
fn empty_skiplist_behavior() {
    let mut sl: SkipList<String> = SkipList::with_seed(4);
    assert!(sl.remove(0).is_none());
    assert!(sl.lower_bound(0).is_none());
    assert_eq!(sl.get(0), None);
    assert_eq!(sl.get(u32::MAX), None);
    assert!(sl.first().is_none());
    assert!(sl.last().is_none());
    assert!(sl.is_empty());
    assert_eq!(sl.level(), 1);
}

// =============================================================================
// Test 6: Lower bound across gaps
// =============================================================================
#[test]
fn lower_bound_finds_smallest_key_at_or_above() {
    let mut sl = ten_nodes();
    for key in [3u32, 25, 35] {
        sl.insert(key, format!("test-{key}"));
    }

    assert_eq!(sl.lower_bound(20).unwrap().key(), 25);
    assert_eq!(sl.lower_bound(0).unwrap().key(), 3);
    assert_eq!(sl.lower_bound(15).unwrap().key(), 15);
    assert_eq!(sl.lower_bound(35).unwrap().value(), "test-35");
    assert!(sl.lower_bound(40).is_none());
}

// =============================================================================
// Test 7: Removing a missing key changes nothing
// =============================================================================
#[test]
fn remove_missing_key_is_noop() {
    let mut sl = ten_nodes();
    let level = sl.level();
    assert!(sl.remove(9).is_none());
    assert!(sl.remove(20).is_none());
    assert_eq!(sl.len(), 10);
    assert_eq!(sl.level(), level);
    assert!(sl.validate().is_ok());
}

// =============================================================================
// Test 8: Back links follow level 0 in reverse
// =============================================================================
// Every node's prev is the node before it; the first node has none and
// the last node is the tail.
#[test]
fn back_links_mirror_forward_links() {
    let mut sl = SkipList::with_seed(8);
    for key in (0..200u32).map(|i| i.wrapping_mul(2_654_435_761)) {
        sl.insert(key, ());
    }

    let first = sl.first().unwrap();
    assert!(first.prev().is_none());

    let mut node = first;
    while let Some(next) = node.next() {
        assert_eq!(next.prev().unwrap().key(), node.key());
        node = next;
    }
    assert_eq!(node.key(), sl.last().unwrap().key());
    assert!(sl.validate().is_ok());
}

// =============================================================================
// Test 9: Removing the ends moves head and tail
// =============================================================================
#[test]
fn remove_first_and_last() {
    let mut sl = ten_nodes();

    sl.remove(10).unwrap();
    let first = sl.first().unwrap();
    assert_eq!(first.key(), 11);
    assert!(first.prev().is_none());

    sl.remove(19).unwrap();
    let last = sl.last().unwrap();
    assert_eq!(last.key(), 18);
    assert!(last.next().is_none());
    assert!(sl.validate().is_ok());
}

// =============================================================================
// Test 10: Remove everything
// =============================================================================
// Draining the list resets it to its constructed shape.
#[test]
fn remove_all_resets_level() {
    let mut sl = ten_nodes();
    for key in 10..20u32 {
        assert!(sl.remove(key).is_some());
    }
    assert!(sl.is_empty());
    assert_eq!(sl.level(), 1);
    assert!(sl.first().is_none());
    assert!(sl.last().is_none());
    assert!(sl.validate().is_ok());

    // Still usable afterwards.
    sl.insert(42, "again".to_string());
    assert_eq!(sl.get(42).map(String::as_str), Some("again"));
}

// =============================================================================
// Test 11: 1000 keys, then remove the odd ones
// =============================================================================
#[test]
fn insert_1000_keys_remove_half() {
    let mut sl = SkipList::with_seed(11);
    for i in 0..1000u32 {
        sl.insert(i * 3, i);
    }
    for i in (1..1000u32).step_by(2) {
        assert_eq!(sl.remove(i * 3).map(|n| n.into_value()), Some(i));
    }
    assert_eq!(sl.len(), 500);
    for i in 0..1000u32 {
        let expected = (i % 2 == 0).then_some(i);
        assert_eq!(sl.get(i * 3).copied(), expected);
    }
    assert!(sl.validate().is_ok());
}

// =============================================================================
// Test 12: Key domain edges
// =============================================================================
#[test]
fn extreme_keys() {
    let mut sl = SkipList::with_seed(12);
    sl.insert(u32::MAX, "max");
    sl.insert(0, "zero");
    assert_eq!(sl.get(0), Some(&"zero"));
    assert_eq!(sl.get(u32::MAX), Some(&"max"));
    assert_eq!(sl.lower_bound(1).unwrap().key(), u32::MAX);
    assert_eq!(sl.remove(u32::MAX).unwrap().value(), &"max");
    assert!(sl.lower_bound(1).is_none());
}

// =============================================================================
// Test 13: get_mut edits in place
// =============================================================================
#[test]
fn get_mut_updates_value() {
    let mut sl = ten_nodes();
    sl.get_mut(12).unwrap().push_str("-edited");
    assert_eq!(sl.get(12).map(String::as_str), Some("test-12-edited"));
    assert!(sl.get_mut(99).is_none());
    assert!(sl.contains_key(12));
    assert!(!sl.contains_key(99));
}

// =============================================================================
// Test 14: Options
// =============================================================================
#[test]
fn options_control_height() {
    let mut sl = SkipList::with_options(Options::default().max_level(1).seed(14)).unwrap();
    for key in 0..100u32 {
        sl.insert(key, ());
    }
    assert_eq!(sl.max_level(), 1);
    assert_eq!(sl.level(), 1);
    assert!(sl.validate().is_ok());

    let err = SkipList::<()>::with_options(Options::default().probability(1.5)).unwrap_err();
    assert!(matches!(err, Error::InvalidOptions(_)));
}

// =============================================================================
// Test 15: Same seed, same shape
// =============================================================================
#[test]
fn same_seed_builds_same_levels() {
    let build = || {
        let mut sl = SkipList::with_seed(15);
        for key in 0..500u32 {
            sl.insert(key, ());
        }
        sl
    };
    let (a, b) = (build(), build());
    assert_eq!(a.level(), b.level());
    for level in 0..a.level() {
        assert_eq!(a.keys_at_level(level), b.keys_at_level(level));
    }
}

// =============================================================================
// Test 16: Clear
// =============================================================================
#[test]
fn clear_empties_the_list() {
    let mut sl = ten_nodes();
    sl.clear();
    assert!(sl.is_empty());
    assert_eq!(sl.level(), 1);
    assert_eq!(sl.get(10), None);
    assert!(sl.validate().is_ok());
    sl.insert(1, "one".to_string());
    assert_eq!(sl.len(), 1);
}
