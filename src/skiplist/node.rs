use std::fmt;

use crate::types::Key;

/// A single node in the skip list arena.
///
/// `forward` has one slot per level the node participates in. Its length is
/// the node's level, drawn once at insert time and never resized, so a node
/// on level `i` is always present on every level below `i`.
///
/// `back` is the level-0 predecessor, or `None` for the first node. It is a
/// plain arena index and never owns anything.
pub(crate) struct SkipNode<V> {
    pub(crate) key: Key,
    pub(crate) value: V,
    pub(crate) forward: Box<[Option<usize>]>,
    pub(crate) back: Option<usize>,
}

impl<V> SkipNode<V> {
    pub(crate) fn new(key: Key, value: V, level: usize) -> Self {
        SkipNode {
            key,
            value,
            forward: vec![None; level].into_boxed_slice(),
            back: None,
        }
    }

    pub(crate) fn level(&self) -> usize {
        self.forward.len()
    }
}

/// Look up a live node. Every link in a consistent list points at an
/// occupied slot, so hitting a freed one is a bug in the list itself.
pub(crate) fn live<V>(slots: &[Option<SkipNode<V>>], idx: usize) -> &SkipNode<V> {
    match slots.get(idx) {
        Some(Some(node)) => node,
        _ => panic!("skip list link points at freed slot {idx}"),
    }
}

/// Borrowed handle to a node stored in a skip list.
///
/// Handles can walk the list in both directions: `next` follows the level-0
/// forward link and `prev` follows the back link.
pub struct NodeRef<'a, V> {
    slots: &'a [Option<SkipNode<V>>],
    idx: usize,
}

impl<'a, V> NodeRef<'a, V> {
    pub(crate) fn new(slots: &'a [Option<SkipNode<V>>], idx: usize) -> Self {
        NodeRef { slots, idx }
    }

    fn node(&self) -> &'a SkipNode<V> {
        live(self.slots, self.idx)
    }

    pub fn key(&self) -> Key {
        self.node().key
    }

    pub fn value(&self) -> &'a V {
        &self.node().value
    }

    /// Number of levels this node participates in.
    pub fn level(&self) -> usize {
        self.node().level()
    }

    /// The node with the next larger key.
    pub fn next(&self) -> Option<NodeRef<'a, V>> {
        self.node().forward[0].map(|idx| NodeRef::new(self.slots, idx))
    }

    /// The node with the next smaller key, or `None` at the front.
    pub fn prev(&self) -> Option<NodeRef<'a, V>> {
        self.node().back.map(|idx| NodeRef::new(self.slots, idx))
    }
}

impl<V> Clone for NodeRef<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for NodeRef<'_, V> {}

impl<V: fmt::Debug> fmt::Debug for NodeRef<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", &self.key())
            .field("value", self.value())
            .field("level", &self.level())
            .finish()
    }
}

/// A node unlinked from the list by `SkipList::remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedNode<V> {
    key: Key,
    value: V,
    level: usize,
}

impl<V> RemovedNode<V> {
    pub(crate) fn from_node(node: SkipNode<V>) -> Self {
        RemovedNode {
            key: node.key,
            level: node.level(),
            value: node.value,
        }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Level the node held while it was linked.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn into_value(self) -> V {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node() {
        let node = SkipNode::new(1000, "abcde", 2);
        assert_eq!(node.key, 1000);
        assert_eq!(node.value, "abcde");
        assert_eq!(node.level(), 2);
        assert!(node.forward.iter().all(Option::is_none));
        assert!(node.back.is_none());
    }

    #[test]
    fn test_node_ref_walks_both_ways() {
        let mut a = SkipNode::new(1, "a", 1);
        let mut b = SkipNode::new(2, "b", 3);
        a.forward[0] = Some(1);
        b.back = Some(0);
        let slots = vec![Some(a), Some(b)];

        let first = NodeRef::new(&slots, 0);
        let second = first.next().unwrap();
        assert_eq!(second.key(), 2);
        assert_eq!(*second.value(), "b");
        assert_eq!(second.level(), 3);
        assert!(second.next().is_none());
        assert_eq!(second.prev().unwrap().key(), 1);
        assert!(first.prev().is_none());
    }

    #[test]
    #[should_panic(expected = "freed slot")]
    fn test_freed_slot_panics() {
        let slots: Vec<Option<SkipNode<()>>> = vec![None];
        live(&slots, 0);
    }

    #[test]
    fn test_removed_node_keeps_level() {
        let removed = RemovedNode::from_node(SkipNode::new(7, String::from("x"), 4));
        assert_eq!(removed.key(), 7);
        assert_eq!(removed.level(), 4);
        assert_eq!(removed.into_value(), "x");
    }
}
