use std::iter::FusedIterator;

use crate::skiplist::node::{live, SkipNode};
use crate::types::Key;

/// Iterator over skip list entries in key order.
///
/// Forward steps follow level 0, which links every node. Backward steps
/// start at the tail and follow the back links.
pub struct Iter<'a, V> {
    slots: &'a [Option<SkipNode<V>>],
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(
        slots: &'a [Option<SkipNode<V>>],
        first: Option<usize>,
        last: Option<usize>,
        len: usize,
    ) -> Self {
        Iter {
            slots,
            front: first,
            back: last,
            remaining: len,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = live(self.slots, self.front?);
        self.front = node.forward[0];
        self.remaining -= 1;
        Some((node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = live(self.slots, self.back?);
        self.back = node.back;
        self.remaining -= 1;
        Some((node.key, &node.value))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// Iterator over the entries whose keys fall inside a range.
///
/// `front` and `back` are the first and last nodes in range. Both ends walk
/// toward each other and stop once they meet.
pub struct Range<'a, V> {
    slots: &'a [Option<SkipNode<V>>],
    front: Option<usize>,
    back: Option<usize>,
}

impl<'a, V> Range<'a, V> {
    pub(crate) fn new(
        slots: &'a [Option<SkipNode<V>>],
        first: Option<usize>,
        last: Option<usize>,
    ) -> Self {
        // An empty range shows up as first sorting after last.
        let (front, back) = match (first, last) {
            (Some(f), Some(l)) if live(slots, f).key <= live(slots, l).key => (first, last),
            _ => (None, None),
        };
        Range { slots, front, back }
    }
}

impl<'a, V> Iterator for Range<'a, V> {
    type Item = (Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.front?;
        let node = live(self.slots, idx);
        if self.back == Some(idx) {
            self.front = None;
            self.back = None;
        } else {
            self.front = node.forward[0];
        }
        Some((node.key, &node.value))
    }
}

impl<V> DoubleEndedIterator for Range<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let idx = self.back?;
        let node = live(self.slots, idx);
        if self.front == Some(idx) {
            self.front = None;
            self.back = None;
        } else {
            self.back = node.back;
        }
        Some((node.key, &node.value))
    }
}

impl<V> FusedIterator for Range<'_, V> {}
