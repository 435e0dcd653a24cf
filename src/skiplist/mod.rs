pub mod iter;
pub mod node;

use std::fmt;
use std::mem;
use std::ops::{Bound, RangeBounds};

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::level::{GeometricLevelGenerator, LevelGenerator};
use crate::options::Options;
use crate::types::{Key, MAX_LEVEL};

pub use iter::{Iter, Range};
pub use node::{NodeRef, RemovedNode};

use node::{live, SkipNode};

/// A position a traversal can stand on: the header sentinel or a real node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pos {
    Head,
    Node(usize),
}

impl Pos {
    fn index(self) -> Option<usize> {
        match self {
            Pos::Head => None,
            Pos::Node(idx) => Some(idx),
        }
    }
}

/// An ordered map from `u32` keys to values, backed by a skip list.
///
/// ```text
/// Level 3:  HEAD ──────────────────────────────► 50 ──────────► NIL
/// Level 2:  HEAD ──────────► 20 ────────────────► 50 ──────────► NIL
/// Level 1:  HEAD ──► 10 ──► 20 ────► 35 ────────► 50 ──► 60 ──► NIL
/// Level 0:  HEAD ──► 10 ──► 20 ──► 25 ──► 35 ──► 50 ──► 60 ──► 70 ► NIL
///                    ◄──────◄──────◄──────◄──────◄──────◄──────◄  back
/// ```
///
/// Nodes live in an arena (`slots`) and link to each other by index. The
/// header is not a node: it is just the `head` array of `max_level` forward
/// links. Level 0 is doubly linked through each node's `back` index, and
/// `tail` names the last node, so the list can be walked from either end.
///
/// Average case: O(log n) insert, lookup, lower bound and remove.
/// Worst case: O(n), with no rebalancing. Balance is purely probabilistic.
///
/// Not synchronized. Wrap it in a lock to share it between threads.
pub struct SkipList<V, G = GeometricLevelGenerator> {
    head: Box<[Option<usize>]>,
    slots: Vec<Option<SkipNode<V>>>,
    free: Vec<usize>,
    tail: Option<usize>,
    len: usize,
    level: usize,
    generator: G,
}

impl<V> SkipList<V> {
    /// Create an empty list with 32 levels, p = 1/4 and an entropy seed.
    pub fn new() -> Self {
        Self::with_generator(GeometricLevelGenerator::default())
    }

    /// Create an empty list whose node levels are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_options(Options::default().seed(seed))
            .unwrap_or_else(|_| unreachable!("default options are valid"))
    }

    /// Create an empty list from validated options.
    pub fn with_options(options: Options) -> Result<Self> {
        options.validate()?;
        let generator = match options.seed {
            Some(seed) => {
                GeometricLevelGenerator::seeded(options.max_level, options.probability, seed)
            }
            None => GeometricLevelGenerator::new(options.max_level, options.probability),
        };
        Ok(Self::with_generator(generator))
    }
}

impl<V> Default for SkipList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, G: LevelGenerator> SkipList<V, G> {
    /// Create an empty list drawing node levels from `generator`.
    ///
    /// # Panics
    /// Panics if the generator's max level is not in `1..=MAX_LEVEL`.
    pub fn with_generator(generator: G) -> Self {
        let max_level = generator.max_level();
        assert!(
            (1..=MAX_LEVEL).contains(&max_level),
            "max_level must be in 1..={MAX_LEVEL}"
        );
        debug!(max_level, "created skip list");
        SkipList {
            head: vec![None; max_level].into_boxed_slice(),
            slots: Vec::new(),
            free: Vec::new(),
            tail: None,
            len: 0,
            level: 1,
            generator,
        }
    }

    /// Number of entries in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Highest level any node currently occupies (1 when empty).
    pub fn level(&self) -> usize {
        self.level
    }

    /// Number of forward links in the header.
    pub fn max_level(&self) -> usize {
        self.head.len()
    }

    /// Insert a key-value pair. Overwrites if the key already exists.
    ///
    /// Returns the previous value on overwrite. An overwrite keeps the
    /// existing node, its level and the list length untouched.
    ///
    /// Algorithm:
    ///   1. Descend from the top level, remembering the last node visited
    ///      on each level (the update set)
    ///   2. If the level-0 successor holds the key, replace its value
    ///   3. Otherwise draw a level, raising the list level if needed
    ///   4. Splice the new node after its update entry on each of its levels
    ///   5. Repair the back link of the node and of its successor
    pub fn insert(&mut self, key: Key, value: V) -> Option<V> {
        let mut update = [Pos::Head; MAX_LEVEL];
        let pred = self.descend(key, |i, pos| update[i] = pos);

        if let Some(idx) = self.forward(pred, 0) {
            if self.node(idx).key == key {
                let node = self.node_mut(idx);
                return Some(mem::replace(&mut node.value, value));
            }
        }

        let drawn = self.generator.random_level();
        debug_assert!(
            (1..=self.max_level()).contains(&drawn),
            "level generator returned {drawn}"
        );
        let level = drawn.clamp(1, self.max_level());
        if level > self.level {
            // update[self.level..level] still points at the header.
            trace!(from = self.level, to = level, "raising list level");
            self.level = level;
        }

        let idx = self.alloc(SkipNode::new(key, value, level));
        for (i, &at) in update.iter().enumerate().take(level) {
            let next = self.forward(at, i);
            self.node_mut(idx).forward[i] = next;
            self.set_forward(at, i, Some(idx));
        }

        self.node_mut(idx).back = update[0].index();
        let successor = self.node(idx).forward[0];
        match successor {
            Some(next) => self.node_mut(next).back = Some(idx),
            None => self.tail = Some(idx),
        }

        self.len += 1;
        None
    }

    /// Look up a key. Returns the value if found.
    pub fn get(&self, key: Key) -> Option<&V> {
        self.get_node(key).map(|node| node.value())
    }

    pub fn get_mut(&mut self, key: Key) -> Option<&mut V> {
        let idx = self.find(key)?;
        Some(&mut self.node_mut(idx).value)
    }

    pub fn contains_key(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    /// Handle to the node holding exactly `key`.
    pub fn get_node(&self, key: Key) -> Option<NodeRef<'_, V>> {
        self.find(key).map(|idx| NodeRef::new(&self.slots, idx))
    }

    /// Handle to the node with the smallest key `>= key`, or `None` if
    /// every stored key is smaller.
    pub fn lower_bound(&self, key: Key) -> Option<NodeRef<'_, V>> {
        self.first_at_or_after(key)
            .map(|idx| NodeRef::new(&self.slots, idx))
    }

    /// Unlink the node holding `key` and hand it back.
    ///
    /// Returns `None` without touching the list if the key is absent.
    pub fn remove(&mut self, key: Key) -> Option<RemovedNode<V>> {
        let mut update = [Pos::Head; MAX_LEVEL];
        let pred = self.descend(key, |i, pos| update[i] = pos);
        let idx = self
            .forward(pred, 0)
            .filter(|&idx| self.node(idx).key == key)?;

        // A node on level i is on every level below it, so the first level
        // that doesn't point at it ends the patching.
        for (i, &at) in update.iter().enumerate().take(self.level) {
            if self.forward(at, i) != Some(idx) {
                break;
            }
            let next = self.node(idx).forward[i];
            self.set_forward(at, i, next);
        }

        let node = self.release(idx);
        match node.forward[0] {
            Some(next) => self.node_mut(next).back = node.back,
            None => self.tail = node.back,
        }

        let before = self.level;
        while self.level > 1 && self.head[self.level - 1].is_none() {
            self.level -= 1;
        }
        if self.level != before {
            trace!(from = before, to = self.level, "shrinking list level");
        }

        self.len -= 1;
        debug_assert!(
            self.tail
                .map_or(self.len == 0, |t| self.node(t).forward[0].is_none())
        );
        Some(RemovedNode::from_node(node))
    }

    /// Node with the smallest key.
    pub fn first(&self) -> Option<NodeRef<'_, V>> {
        self.head[0].map(|idx| NodeRef::new(&self.slots, idx))
    }

    /// Node with the largest key.
    pub fn last(&self) -> Option<NodeRef<'_, V>> {
        self.tail.map(|idx| NodeRef::new(&self.slots, idx))
    }

    /// Drop every entry. The level generator keeps its state.
    pub fn clear(&mut self) {
        self.head.iter_mut().for_each(|link| *link = None);
        self.slots.clear();
        self.free.clear();
        self.tail = None;
        self.len = 0;
        self.level = 1;
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.slots, self.head[0], self.tail, self.len)
    }

    /// Iterate over the entries whose keys fall inside `range`.
    pub fn range<R: RangeBounds<Key>>(&self, range: R) -> Range<'_, V> {
        let first = match range.start_bound() {
            Bound::Included(&start) => self.first_at_or_after(start),
            Bound::Excluded(&start) => start
                .checked_add(1)
                .and_then(|start| self.first_at_or_after(start)),
            Bound::Unbounded => self.head[0],
        };
        let last = match range.end_bound() {
            Bound::Included(&end) => match end.checked_add(1) {
                Some(end) => self.last_before(end),
                None => self.tail,
            },
            Bound::Excluded(&end) => self.last_before(end),
            Bound::Unbounded => self.tail,
        };
        Range::new(&self.slots, first, last)
    }

    /// Keys linked on `level` (0-based), in order. Empty above `max_level`.
    pub fn keys_at_level(&self, level: usize) -> Vec<Key> {
        let mut keys = Vec::new();
        let mut cur = self.head.get(level).copied().flatten();
        while let Some(idx) = cur {
            let node = self.node(idx);
            keys.push(node.key);
            cur = node.forward[level];
        }
        keys
    }

    /// Walk the whole structure and check its invariants.
    ///
    /// Checks that every level is strictly increasing, that each node is
    /// linked on exactly the levels it owns, that back links mirror level 0,
    /// and that `tail`, `len` and `level` agree with what is linked.
    pub fn validate(&self) -> Result<()> {
        let max_level = self.max_level();
        if self.level == 0 || self.level > max_level {
            return Err(corruption(format!(
                "level {} outside 1..={max_level}",
                self.level
            )));
        }
        if let Some(i) = (self.level..max_level).find(|&i| self.head[i].is_some()) {
            return Err(corruption(format!(
                "header linked on level {i} above list level {}",
                self.level
            )));
        }

        let mut lanes: Vec<Vec<usize>> = Vec::with_capacity(self.level);
        for i in 0..self.level {
            let lane = self.walk_lane(i)?;
            if let Some(below) = lanes.last() {
                if !is_subsequence(&lane, below) {
                    return Err(corruption(format!(
                        "level {i} links a node missing from level {}",
                        i - 1
                    )));
                }
            }
            lanes.push(lane);
        }

        let bottom = &lanes[0];
        if bottom.len() != self.len {
            return Err(corruption(format!(
                "length is {} but level 0 links {} nodes",
                self.len,
                bottom.len()
            )));
        }
        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        if occupied != self.len {
            return Err(corruption(format!(
                "{} nodes allocated but {} reachable",
                occupied, self.len
            )));
        }

        for (pos, &idx) in bottom.iter().enumerate() {
            let expected = pos.checked_sub(1).map(|p| bottom[p]);
            if self.node(idx).back != expected {
                return Err(corruption(format!(
                    "back link of key {} disagrees with level 0",
                    self.node(idx).key
                )));
            }
        }
        if self.tail != bottom.last().copied() {
            return Err(corruption("tail is not the last node on level 0".into()));
        }

        let tallest = bottom
            .iter()
            .map(|&idx| self.node(idx).level())
            .max()
            .unwrap_or(1);
        if tallest != self.level {
            return Err(corruption(format!(
                "list level is {} but tallest node has {tallest} levels",
                self.level
            )));
        }
        for (i, lane) in lanes.iter().enumerate() {
            let owners = bottom
                .iter()
                .filter(|&&idx| self.node(idx).level() > i)
                .count();
            if owners != lane.len() {
                return Err(corruption(format!(
                    "{owners} nodes own level {i} but {} are linked",
                    lane.len()
                )));
            }
        }
        Ok(())
    }

    /// The traversal shared by every operation: starting at the header on
    /// the top level, move forward while the next key is smaller than
    /// `key`, then drop a level. `on_drop` sees the position left on each
    /// level. Returns the position reached on level 0, i.e. the last node
    /// with a key below `key` (or the header).
    fn descend(&self, key: Key, mut on_drop: impl FnMut(usize, Pos)) -> Pos {
        let mut x = Pos::Head;
        for i in (0..self.level).rev() {
            while let Some(next) = self.forward(x, i) {
                if self.node(next).key >= key {
                    break;
                }
                x = Pos::Node(next);
            }
            on_drop(i, x);
        }
        x
    }

    fn find(&self, key: Key) -> Option<usize> {
        self.first_at_or_after(key)
            .filter(|&idx| self.node(idx).key == key)
    }

    fn first_at_or_after(&self, key: Key) -> Option<usize> {
        let pred = self.descend(key, |_, _| {});
        self.forward(pred, 0)
    }

    fn last_before(&self, key: Key) -> Option<usize> {
        self.descend(key, |_, _| {}).index()
    }

    /// Indices linked on level `i`, checking order and ownership as we go.
    fn walk_lane(&self, i: usize) -> Result<Vec<usize>> {
        let mut lane = Vec::new();
        let mut prev: Option<Key> = None;
        let mut cur = self.head[i];
        while let Some(idx) = cur {
            let node = self
                .slots
                .get(idx)
                .and_then(Option::as_ref)
                .ok_or_else(|| corruption(format!("level {i} links freed slot {idx}")))?;
            if node.level() <= i {
                return Err(corruption(format!(
                    "key {} linked on level {i} but owns {} levels",
                    node.key,
                    node.level()
                )));
            }
            if let Some(prev) = prev {
                if prev >= node.key {
                    return Err(corruption(format!(
                        "level {i} out of order: {prev} before {}",
                        node.key
                    )));
                }
            }
            lane.push(idx);
            // Strictly increasing keys bound the lane; more means a cycle.
            if lane.len() > self.slots.len() {
                return Err(corruption(format!("level {i} does not terminate")));
            }
            prev = Some(node.key);
            cur = node.forward[i];
        }
        Ok(lane)
    }

    fn node(&self, idx: usize) -> &SkipNode<V> {
        live(&self.slots, idx)
    }

    fn node_mut(&mut self, idx: usize) -> &mut SkipNode<V> {
        match self.slots.get_mut(idx) {
            Some(Some(node)) => node,
            _ => panic!("skip list link points at freed slot {idx}"),
        }
    }

    fn forward(&self, at: Pos, level: usize) -> Option<usize> {
        match at {
            Pos::Head => self.head[level],
            Pos::Node(idx) => self.node(idx).forward[level],
        }
    }

    fn set_forward(&mut self, at: Pos, level: usize, to: Option<usize>) {
        match at {
            Pos::Head => self.head[level] = to,
            Pos::Node(idx) => self.node_mut(idx).forward[level] = to,
        }
    }

    fn alloc(&mut self, node: SkipNode<V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> SkipNode<V> {
        match self.slots.get_mut(idx).and_then(Option::take) {
            Some(node) => {
                self.free.push(idx);
                node
            }
            None => panic!("skip list released freed slot {idx}"),
        }
    }
}

fn corruption(msg: String) -> Error {
    Error::Corruption(msg)
}

/// Whether `upper` appears in `lower` in the same order.
fn is_subsequence(upper: &[usize], lower: &[usize]) -> bool {
    let mut rest = lower.iter();
    upper.iter().all(|idx| rest.any(|other| other == idx))
}

impl<'a, V, G: LevelGenerator> IntoIterator for &'a SkipList<V, G> {
    type Item = (Key, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V, G: LevelGenerator> Extend<(Key, V)> for SkipList<V, G> {
    fn extend<I: IntoIterator<Item = (Key, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V> FromIterator<(Key, V)> for SkipList<V> {
    fn from_iter<I: IntoIterator<Item = (Key, V)>>(iter: I) -> Self {
        let mut list = SkipList::new();
        list.extend(iter);
        list
    }
}

impl<V: fmt::Debug, G: LevelGenerator> fmt::Debug for SkipList<V, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
