#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// When the storage of an erased entry is released.
///
/// Erasing an entry always unlinks it from the tree at once.  The policy only
/// decides how long the unlinked node (a *tombstone*) keeps its slot, and so
/// how long a [`Cursor`](crate::Cursor) to it keeps dereferencing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Reclaim {
    /// Tombstones keep their key and value until
    /// [`clear`](crate::AvlMap::clear),
    /// [`purge_tombstones`](crate::AvlMap::purge_tombstones) or drop.
    ///
    /// Every erase keeps its node, so a long-lived map with steady
    /// insert/erase churn grows without bound unless the owner calls
    /// `purge_tombstones` from time to time or picks [`Reclaim::OnErase`].
    #[default]
    AtTeardown,

    /// Tombstones are destroyed as soon as they are unlinked.  Cursors to
    /// them become invalid.
    OnErase,
}

/// Node storage settings, fixed when the map is constructed.
///
/// # Examples
/// ```
/// use avl_cursor_map::{AvlMap, Config, Reclaim};
///
/// let cfg = Config::new().with_capacity(64).with_reclaim(Reclaim::OnErase);
/// let mut m = AvlMap::with_config(cfg);
/// let (c, _) = m.insert(1, "one");
/// m.erase(&1);
/// assert!(!m.is_valid(c));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Number of node slots to allocate up front.
    pub capacity: usize,
    /// Tombstone reclamation policy.
    pub reclaim: Reclaim,
}

impl Config {
    /// The default settings: no preallocation, reclaim at teardown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of slots allocated up front.
    pub fn with_capacity(self, capacity: usize) -> Self {
        Config { capacity, ..self }
    }

    /// Sets the tombstone reclamation policy.
    pub fn with_reclaim(self, reclaim: Reclaim) -> Self {
        Config { reclaim, ..self }
    }
}
