//! # An ordered map with erase-safe cursors
//!
//! `avl_cursor_map` provides [`AvlMap`], a map from unique keys to values
//! kept in an [AVL tree](https://en.wikipedia.org/wiki/AVL_tree) whose nodes
//! carry parent links.  Lookup, insertion and erasure take `O(log n)` time
//! and iteration is in key order.
//!
//! Positions in the map are [`Cursor`]s: small copyable handles that do not
//! borrow the map.  A cursor survives mutation of the map.  When the entry it
//! points at is erased, the entry becomes a *tombstone*: it is unlinked from
//! the tree but, under the default [`Reclaim`] policy, its key and value stay
//! readable through the cursor until the map is cleared or dropped.
//!
//! ```
//! use avl_cursor_map::AvlMap;
//!
//! let mut m = AvlMap::from([(1, "a"), (2, "b"), (3, "c")]);
//! let mut c = m.begin();
//! while c != m.end() {
//!     // erase the current entry and continue from its successor
//!     c = m.erase_at(c);
//! }
//! assert!(m.is_empty());
//! ```
//!
//! The [`verify`] module audits the tree structure and is meant for tests.

#[macro_use]
mod trace;

mod avl;
pub use avl::AvlMap;
pub use avl::{AvlSet, SetIter};
pub use avl::{Cursor, Iter, Keys, Values};

mod compare;
pub use compare::{Compare, Natural};

mod config;
pub use config::{Config, Reclaim};

mod error;
pub use error::Error;

pub mod verify;
