//! # Skip List Engine
//!
//! An in-memory ordered map from `u32` keys to arbitrary values, built on a
//! skip list.
//!
//! ## Core idea
//! Keep every entry in a sorted linked list (level 0), then add sparser
//! "express lane" lists on top. Each node is promoted to the next lane with
//! probability 1/4, so a search skips most of the list on the upper lanes
//! and only walks a few nodes per level. Balance comes from the coin flips
//! alone: there is no rebalancing on insert or delete.
//!
//! ```
//! use skiplist_engine::SkipList;
//!
//! let mut list = SkipList::with_seed(7);
//! for key in [30u32, 10, 20] {
//!     list.insert(key, format!("test-{key}"));
//! }
//! assert_eq!(list.get(20).map(String::as_str), Some("test-20"));
//! assert_eq!(list.lower_bound(11).map(|n| n.key()), Some(20));
//! assert_eq!(list.remove(10).map(|n| n.into_value()), Some("test-10".to_string()));
//! assert_eq!(list.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec![20, 30]);
//! ```

pub mod error;
pub mod level;
pub mod options;
pub mod skiplist;
pub mod types;

// Public re-exports for the top-level API
pub use error::{Error, Result};
pub use level::{GeometricLevelGenerator, LevelGenerator};
pub use options::Options;
pub use skiplist::{Iter, NodeRef, Range, RemovedNode, SkipList};
pub use types::{Key, MAX_LEVEL, P};
