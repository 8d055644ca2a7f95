#![warn(missing_docs)]
use std::borrow::Borrow;
use std::cmp::Ordering::*;
use std::fmt::{Debug, Formatter};

use crate::{Compare, Config, Error, Natural, Reclaim};

mod avl_set;
pub use avl_set::{AvlSet, SetIter};

mod balance;

mod cursor;
pub use cursor::{Cursor, Iter, Keys, Values};

pub(crate) mod node;
use node::{Arena, Link};

/// A map from keys to values sorted by key.
///
/// The API follows [`std::collections::BTreeMap`] where it can, with two
/// deliberate differences:
///
/// * Inserting never overwrites.  [`insert`](Self::insert),
///   [`emplace`](Self::emplace) and [`try_emplace`](Self::try_emplace) leave
///   an existing entry untouched and report whether they inserted.
/// * Positions are [`Cursor`]s, which do not borrow the map.  A cursor can be
///   held across insertions and erasures and handed back to the map to read
///   the entry, step to a neighbour, or erase.
///
/// Internally the map is an [AVL tree](https://en.wikipedia.org/wiki/AVL_tree)
/// whose nodes know their parent.  The nodes live in an arena owned by the
/// map; erasing an entry unlinks its node from the tree and leaves it behind
/// as a *tombstone*.  The map's [`Reclaim`] policy decides when tombstones are
/// released.
///
/// Keys are ordered by a [`Compare`] implementation, [`Natural`] by default.
#[derive(Clone)]
pub struct AvlMap<K, V, C = Natural> {
    arena: Arena<K, V>,
    root: Link,
    len: usize,
    tombstones: Vec<usize>,
    cmp: C,
    config: Config,
}

impl<K: Debug, V: Debug, C> Debug for AvlMap<K, V, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> PartialEq for AvlMap<K, V, C>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for AvlMap<K, V, C> {}

impl<K, V, C, Q> std::ops::Index<&Q> for AvlMap<K, V, C>
where
    K: Borrow<Q>,
    C: Compare<K> + Compare<Q>,
    Q: ?Sized,
{
    type Output = V;

    fn index(&self, index: &Q) -> &Self::Output {
        match self.get(index) {
            Some(v) => v,
            None => panic!("key not found in AvlMap"),
        }
    }
}

impl<K, V> AvlMap<K, V> {
    /// Creates a new, empty map ordered by `K`'s [`Ord`].
    /// # Examples
    /// ```
    /// use avl_cursor_map::AvlMap;
    /// let m: AvlMap<usize, usize> = AvlMap::new();
    /// assert!(m.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty map with the given storage settings.
    pub fn with_config(config: Config) -> Self {
        Self::with_config_and_comparator(config, Natural)
    }
}

impl<K, V, C> AvlMap<K, V, C> {
    /// Creates an empty map ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_config_and_comparator(Config::default(), cmp)
    }

    /// Creates an empty map with the given storage settings, ordered by
    /// `cmp`.
    pub fn with_config_and_comparator(config: Config, cmp: C) -> Self {
        AvlMap {
            arena: Arena::with_capacity(config.capacity),
            root: None,
            len: 0,
            tombstones: Vec::new(),
            cmp,
            config,
        }
    }

    /// Returns the number of entries in self.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if self contains no entries, false otherwise.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The storage settings the map was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The number of erased entries whose storage has not been released.
    pub fn tombstones(&self) -> usize {
        self.tombstones.len()
    }

    /// Height of the tree: 0 when empty, 1 for a single entry.
    pub fn height(&self) -> usize {
        self.arena.height(self.root) as usize
    }

    /// Releases the storage of every erased entry and returns how many were
    /// released.
    ///
    /// Cursors to those entries become invalid.
    pub fn purge_tombstones(&mut self) -> usize {
        let dead = std::mem::take(&mut self.tombstones);
        for &i in dead.iter() {
            self.arena.destroy(i);
        }
        debug_log!(purged = dead.len(), "purged tombstones");
        dead.len()
    }

    /// Drops all entries, including tombstones, from the map.
    ///
    /// Every cursor obtained before the call becomes invalid.
    pub fn clear(&mut self) {
        let live = self.arena.force_destroy_subtree(self.root.take());
        debug_assert_eq!(live, self.len);
        self.len = 0;
        self.purge_tombstones();
        debug_assert_eq!(self.arena.occupied(), 0);
        debug_log!(live, "cleared");
    }

    /// Creates an iterator over the map entries, sorted by key.
    ///
    /// # Examples
    /// ```
    /// use avl_cursor_map::AvlMap;
    ///
    /// let m = AvlMap::from([(0,1), (1,2), (2, 3)]);
    /// for (i, (k, v)) in m.iter().enumerate() {
    ///     assert_eq!(&i, k);
    ///     assert_eq!(&(i+1), v);
    /// }
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(
            &self.arena,
            self.root.map(|r| self.arena.min(r)),
            self.root.map(|r| self.arena.max(r)),
            self.len,
        )
    }

    /// Produces an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Produces an iterator over the values of the map, ordered by their
    /// associated keys.
    ///
    /// # Examples
    /// ```
    /// use avl_cursor_map::AvlMap;
    ///
    /// let m = AvlMap::from([(0,0), (1,1), (2,2)]);
    /// let sum_values: u32 = m.values().sum();
    /// assert_eq!(sum_values, 3);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Applies f to each entry of the map in order of the keys.
    pub fn for_each<F: FnMut((&K, &V))>(&self, mut f: F) {
        self.iter().for_each(&mut f);
    }

    /// Applies a function to every key-value pair in the map, in key order,
    /// with a mutable reference to each value.
    ///
    /// # Examples
    /// ```
    /// use avl_cursor_map::AvlMap;
    ///
    /// let mut m = AvlMap::new();
    /// m.insert(0, "a");
    /// m.for_each_mut(|(_, v)| *v = "b");
    /// assert_eq!(m.get(&0), Some(&"b"));
    /// ```
    pub fn for_each_mut<F: FnMut((&K, &mut V))>(&mut self, mut f: F) {
        let mut curr = self.root.map(|r| self.arena.min(r));
        while let Some(i) = curr {
            let n = &mut self.arena[i];
            f((&n.key, &mut n.val));
            curr = self.arena.successor(i);
        }
    }

    /// Returns the key-value pair for the least key in the map
    ///
    /// # Examples
    /// ```
    /// use avl_cursor_map::AvlMap;
    ///
    /// let m = AvlMap::from([(2,0), (1,0)]);
    /// assert_eq!(m.first_key_value(), Some((&1, &0)));
    /// ```
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|r| {
            let n = &self.arena[self.arena.min(r)];
            (&n.key, &n.val)
        })
    }

    /// Returns the key-value pair for the greatest key in the map
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|r| {
            let n = &self.arena[self.arena.max(r)];
            (&n.key, &n.val)
        })
    }

    pub(crate) fn arena(&self) -> &Arena<K, V> {
        &self.arena
    }

    pub(crate) fn root(&self) -> Link {
        self.root
    }

    pub(crate) fn comparator(&self) -> &C {
        &self.cmp
    }

    #[cfg(test)]
    pub(crate) fn arena_mut(&mut self) -> &mut Arena<K, V> {
        &mut self.arena
    }

    #[cfg(test)]
    pub(crate) fn len_mut(&mut self) -> &mut usize {
        &mut self.len
    }

    // Substitutes `new` for `old` among the children of `parent`.
    fn replace_child(&mut self, parent: Link, old: usize, new: Link) {
        if let Some(p) = parent {
            let p = &mut self.arena[p];
            if p.left == Some(old) {
                p.left = new;
            } else {
                p.right = new;
            }
        }
    }

    // Removes node i from the tree structure and leaves it tombstoned in its
    // slot.  The caller decides when the slot is released.
    fn unlink(&mut self, i: usize) {
        let (parent, left, right) = {
            let n = &self.arena[i];
            (n.parent, n.left, n.right)
        };

        let (replacement, rebalance_from) = match (left, right) {
            (Some(l), Some(r)) => {
                // promote the in-order successor, the least node on the right
                let succ = self.arena.min(r);
                self.arena[succ].left = Some(l);
                self.arena[l].parent = Some(succ);

                let from = if succ != r {
                    // splice succ out of its old place, below r
                    let succ_parent = self.arena[succ].parent;
                    let succ_right = self.arena[succ].right;
                    if let Some(sr) = succ_right {
                        self.arena[sr].parent = succ_parent;
                    }
                    if let Some(sp) = succ_parent {
                        self.arena[sp].left = succ_right;
                    }
                    self.arena[succ].right = Some(r);
                    self.arena[r].parent = Some(succ);
                    succ_parent
                } else {
                    Some(succ)
                };

                self.arena[succ].parent = parent;
                self.replace_child(parent, i, Some(succ));
                (Some(succ), from)
            }

            _ => {
                let child = left.or(right);
                if let Some(c) = child {
                    self.arena[c].parent = parent;
                }
                self.replace_child(parent, i, child);
                (child, parent)
            }
        };

        if self.root == Some(i) {
            self.root = replacement;
        }
        self.len -= 1;

        self.arena.mark_deleted(i);
        self.arena.detach(i);

        if let Some(from) = rebalance_from {
            self.arena.update_height(Some(from));
            self.arena.rebalance_path(&mut self.root, from);
        }
    }

    // Unlinks a live node and then applies the reclaim policy.  Returns false
    // if the node was already erased.
    fn erase_node(&mut self, i: usize) -> bool {
        if self.arena[i].deleted {
            return false;
        }

        self.unlink(i);
        match self.config.reclaim {
            Reclaim::AtTeardown => self.tombstones.push(i),
            Reclaim::OnErase => {
                self.arena.destroy(i);
            }
        }
        debug_log!(slot = i, len = self.len, "erased");
        true
    }

    fn cursor(&self, link: Link) -> Cursor {
        link.map_or(Cursor::END, |i| Cursor::new(i, self.arena.gen(i)))
    }
}

impl<K, V, C: Compare<K>> AvlMap<K, V, C> {
    // Binary search for key starting at start.  Returns the last node visited
    // before the match (or before falling off the tree) and the match.
    fn find_node<Q>(&self, start: Link, key: &Q) -> (Link, Link)
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let mut parent = None;
        let mut curr = start;
        while let Some(i) = curr {
            let n = &self.arena[i];
            match self.cmp.compare(key, n.key.borrow()) {
                Equal => return (parent, curr),
                Less => {
                    parent = curr;
                    curr = n.left;
                }
                Greater => {
                    parent = curr;
                    curr = n.right;
                }
            }
        }

        (parent, None)
    }

    // Links the detached node i into the tree.  The attachment point is
    // searched for again from hint (the parent found by an earlier search),
    // so the hint only has to be an ancestor of the right spot.
    fn insert_node(&mut self, hint: Link, i: usize) {
        self.len += 1;

        let mut p = match hint.or(self.root) {
            Some(p) => p,
            None => {
                self.root = Some(i);
                debug_log!(slot = i, len = self.len, "inserted root");
                return; // *** EARLY RETURN ***
            }
        };

        let go_left = loop {
            let n = &self.arena[p];
            let go_left = self.cmp.compare(&self.arena[i].key, &n.key) == Less;
            let next = if go_left { n.left } else { n.right };
            match next {
                Some(c) => p = c,
                None => break go_left,
            }
        };

        self.arena[i].parent = Some(p);
        if go_left {
            self.arena[p].left = Some(i);
        } else {
            self.arena[p].right = Some(i);
        }

        self.arena.update_height(Some(p));
        self.arena.rebalance_path(&mut self.root, p);
        debug_log!(slot = i, len = self.len, "inserted");
    }

    // Inserts key if absent, building its value with make.  Returns the slot
    // of the entry for key and whether it was inserted.
    fn try_emplace_slot<F>(&mut self, key: K, make: F) -> (usize, bool)
    where
        F: FnOnce() -> V,
    {
        let (parent, found) = self.find_node(self.root, &key);
        if let Some(i) = found {
            return (i, false);
        }

        let i = self.arena.construct(key, make());
        self.insert_node(parent, i);
        (i, true)
    }

    /// Returns a cursor to the entry for `key`, or [`end`](Self::end) if
    /// there is none.
    ///
    /// # Examples
    /// ```
    /// use avl_cursor_map::AvlMap;
    ///
    /// let m = AvlMap::from([(1, "a")]);
    /// assert_eq!(m.key_value(m.find(&1)), Some((&1, &"a")));
    /// assert_eq!(m.find(&2), m.end());
    /// ```
    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.cursor(self.find_node(self.root, key).1)
    }

    /// Returns a reference to the value associated with `key`, or
    /// [`Error::NotFound`].
    ///
    /// # Examples
    /// ```
    /// use avl_cursor_map::{AvlMap, Error};
    ///
    /// let m = AvlMap::from([(1, 10)]);
    /// assert_eq!(m.at(&1), Ok(&10));
    /// assert_eq!(m.at(&2), Err(Error::NotFound));
    /// ```
    pub fn at<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.get(key).ok_or(Error::NotFound)
    }

    /// Returns a mutable reference to the value associated with `key`, or
    /// [`Error::NotFound`].
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, Error>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.get_mut(key).ok_or(Error::NotFound)
    }

    /// Returns a reference to the value associated with k.
    ///
    /// # Example
    /// ```
    /// use avl_cursor_map::AvlMap;
    ///
    /// let mut m = AvlMap::new();
    /// m.insert(0, 100);
    ///
    /// assert_eq!(m.get(&0), Some(&100));
    /// ```
    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let (_, found) = self.find_node(self.root, k);
        found.map(|i| &self.arena[i].val)
    }

    /// Returns a mutable reference to the value associated with k.
    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let (_, found) = self.find_node(self.root, k);
        found.map(|i| &mut self.arena[i].val)
    }

    /// Tests if self contains an entry for the given key.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.find_node(self.root, key).1.is_some()
    }

    /// Returns the number of entries for `key`: 0 or 1.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.contains(key) as usize
    }

    /// Returns the value for `key`, inserting `V::default()` first if the key
    /// is absent.
    ///
    /// # Examples
    /// ```
    /// use avl_cursor_map::AvlMap;
    ///
    /// let mut counts = AvlMap::new();
    /// for w in ["a", "b", "a"] {
    ///     *counts.get_or_insert_default(w) += 1;
    /// }
    /// assert_eq!(counts.get(&"a"), Some(&2));
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let (i, _) = self.try_emplace_slot(key, V::default);
        &mut self.arena[i].val
    }

    /// Inserts a key-value pair unless the key is already present.
    ///
    /// Returns a cursor to the entry for the key and whether the pair was
    /// inserted.  An existing entry keeps its value; `val` is dropped.
    ///
    /// # Examples
    /// ```
    /// use avl_cursor_map::AvlMap;
    ///
    /// let mut m = AvlMap::new();
    /// assert!(m.insert(0, "a").1);
    /// assert!(!m.insert(0, "b").1);
    /// assert_eq!(m.get(&0), Some(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, val: V) -> (Cursor, bool) {
        self.try_emplace(key, move || val)
    }

    /// Builds an entry with `make` and inserts it unless its key is already
    /// present, in which case the new entry is dropped.
    ///
    /// The entry is constructed before the search; use
    /// [`try_emplace`](Self::try_emplace) to build only on insertion.
    pub fn emplace<F>(&mut self, make: F) -> (Cursor, bool)
    where
        F: FnOnce() -> (K, V),
    {
        let (key, val) = make();
        let i = self.arena.construct(key, val);
        let (parent, found) = self.find_node(self.root, &self.arena[i].key);

        match found {
            Some(existing) => {
                self.arena.destroy(i);
                (self.cursor(Some(existing)), false)
            }
            None => {
                self.insert_node(parent, i);
                (self.cursor(Some(i)), true)
            }
        }
    }

    /// Inserts `key` with the value built by `make` unless the key is already
    /// present.  `make` only runs when the key is inserted.
    ///
    /// # Examples
    /// ```
    /// use avl_cursor_map::AvlMap;
    ///
    /// let mut m = AvlMap::from([(1, 1)]);
    /// let (_, inserted) = m.try_emplace(1, || unreachable!());
    /// assert!(!inserted);
    /// ```
    pub fn try_emplace<F>(&mut self, key: K, make: F) -> (Cursor, bool)
    where
        F: FnOnce() -> V,
    {
        let (i, inserted) = self.try_emplace_slot(key, make);
        (self.cursor(Some(i)), inserted)
    }

    /// Erases the entry for `key` and returns the number of entries erased:
    /// 1 if the key was present, 0 otherwise.
    ///
    /// Cursors to the erased entry see a tombstone (see [`Reclaim`]).
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        match self.find_node(self.root, key).1 {
            Some(i) => self.erase_node(i) as usize,
            None => 0,
        }
    }

    /// Removes a key from the map and returns the unmapped value.
    ///
    /// Unlike [`erase`](Self::erase) the entry's storage is released at once,
    /// whatever the reclaim policy, and cursors to it become invalid.
    ///
    /// # Examples
    /// ```
    /// use avl_cursor_map::AvlMap;
    ///
    /// let mut m = AvlMap::new();
    /// m.insert(1, 2);
    /// m.insert(2, 3);
    /// assert_eq!(m.remove(&2), Some(3));
    /// assert_eq!(m.remove(&2), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let i = self.find_node(self.root, key).1?;
        self.unlink(i);
        let n = self.arena.destroy(i);
        debug_log!(slot = i, len = self.len, "removed");
        Some(n.val)
    }

    // The first live node whose key is greater than key.
    fn first_after(&self, key: &K) -> Link {
        let mut best = None;
        let mut curr = self.root;
        while let Some(i) = curr {
            let n = &self.arena[i];
            if self.cmp.compare(&n.key, key) == Greater {
                best = curr;
                curr = n.left;
            } else {
                curr = n.right;
            }
        }
        best
    }

    // The last live node whose key is less than key.
    fn last_before(&self, key: &K) -> Link {
        let mut best = None;
        let mut curr = self.root;
        while let Some(i) = curr {
            let n = &self.arena[i];
            if self.cmp.compare(&n.key, key) == Less {
                best = curr;
                curr = n.right;
            } else {
                curr = n.left;
            }
        }
        best
    }

    #[cfg(test)]
    fn chk(&self)
    where
        K: Debug,
    {
        if let Err(v) = crate::verify::check(self) {
            panic!("{v}");
        }
    }
}

impl<K, V, C: Default> Default for AvlMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for AvlMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for AvlMap<K, V>
where
    K: Ord,
{
    fn from(vs: [(K, V); N]) -> Self {
        AvlMap::from_iter(vs)
    }
}

impl<K, V, C> FromIterator<(K, V)> for AvlMap<K, V, C>
where
    C: Compare<K> + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut m = AvlMap::default();
        m.extend(iter);
        m
    }
}

impl<'a, K, V, C> IntoIterator for &'a AvlMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    extern crate quickcheck;
    use super::*;
    use quickcheck::quickcheck;

    fn root_key<V, C>(m: &AvlMap<u32, V, C>) -> Option<u32> {
        m.root.map(|r| m.arena[r].key)
    }

    fn bal_test(vs: Vec<(u8, u32)>) {
        let mut m = AvlMap::new();
        for &(k, v) in vs.iter() {
            m.insert(k, v);
            m.chk();
        }
    }

    fn rm_test(vs: Vec<(i8, u32)>) {
        let mut m = AvlMap::new();
        let mut btree = std::collections::BTreeMap::new();

        for &(k, v) in vs.iter() {
            match k {
                1..=i8::MAX => {
                    let k = k % 32;
                    let inserted = !btree.contains_key(&k);
                    btree.entry(k).or_insert(v);
                    assert_eq!(m.insert(k, v).1, inserted);
                }

                0 | i8::MIN => (),

                _ => {
                    let k = -k % 32;
                    let expected = btree.remove(&k).is_some() as usize;
                    assert_eq!(m.erase(&k), expected);
                }
            }

            assert!(m.iter().eq(btree.iter()));
            m.chk();
        }
    }

    // systematically try erasing each element of m
    fn chk_all_erases(m: AvlMap<u8, u8>) {
        for (k, _) in m.iter() {
            let mut m2 = m.clone();
            assert_eq!(m2.erase(k), 1);
            assert!(!m2.contains(k));
            assert_eq!(m2.len(), m.len() - 1);
            m2.chk();
        }
    }

    #[test]
    fn erase_each_test() {
        // build map in order to encourage skewing
        let m: AvlMap<_, _> = (0..32).map(|x| (x, x + 100)).collect();
        chk_all_erases(m);

        // build map in reverse order to encourage opposite skewing
        let m: AvlMap<_, _> = (0..32).rev().map(|x| (x, x + 100)).collect();
        chk_all_erases(m);
    }

    #[test]
    fn ascending_three_rotates_left() {
        let mut m = AvlMap::new();
        m.insert(1u32, ());
        m.insert(2, ());
        assert_eq!(root_key(&m), Some(1));

        m.insert(3, ());
        assert_eq!(root_key(&m), Some(2));
        let r = m.root.unwrap();
        assert_eq!(m.arena[m.arena[r].left.unwrap()].key, 1);
        assert_eq!(m.arena[m.arena[r].right.unwrap()].key, 3);
        assert_eq!(m.height(), 2);
        m.chk();
    }

    #[test]
    fn descending_three_rotates_right() {
        let mut m = AvlMap::new();
        for k in [3u32, 2, 1] {
            m.insert(k, ());
        }
        assert_eq!(root_key(&m), Some(2));
        m.chk();
    }

    #[test]
    fn zig_zag_double_rotations() {
        let mut m = AvlMap::new();
        for k in [3u32, 1, 2] {
            m.insert(k, ());
        }
        assert_eq!(root_key(&m), Some(2));
        m.chk();

        let mut m = AvlMap::new();
        for k in [1u32, 3, 2] {
            m.insert(k, ());
        }
        assert_eq!(root_key(&m), Some(2));
        m.chk();
    }

    #[test]
    fn erase_promotes_successor() {
        // 4 has two children; its successor 5 sits below 6
        let mut m: AvlMap<u32, ()> = [4, 2, 6, 1, 3, 5, 7].into_iter().map(|k| (k, ())).collect();
        assert_eq!(root_key(&m), Some(4));

        assert_eq!(m.erase(&4), 1);
        assert_eq!(root_key(&m), Some(5));
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 5, 6, 7]);
        m.chk();

        // now the successor of 5 is its immediate right child
        assert_eq!(m.erase(&5), 1);
        assert_eq!(root_key(&m), Some(6));
        m.chk();
    }

    #[test]
    fn erase_root_with_one_child() {
        let mut m = AvlMap::from([(1u32, ()), (2, ())]);
        assert_eq!(m.erase(&1), 1);
        assert_eq!(root_key(&m), Some(2));
        assert_eq!(m.arena[m.root.unwrap()].parent, None);
        m.chk();

        assert_eq!(m.erase(&2), 1);
        assert!(m.root.is_none());
        assert_eq!(m.height(), 0);
        m.chk();
    }

    #[test]
    fn emplace_discards_duplicate() {
        let mut m = AvlMap::from([(1, "one")]);
        let (c, inserted) = m.emplace(|| (1, "uno"));
        assert!(!inserted);
        assert_eq!(m.key_value(c), Some((&1, &"one")));
        // the speculative node went back to the arena
        assert_eq!(m.arena.occupied(), 1);

        let (c, inserted) = m.emplace(|| (2, "two"));
        assert!(inserted);
        assert_eq!(m.key_value(c), Some((&2, &"two")));
        m.chk();
    }

    #[test]
    fn hint_is_researched() {
        // a hint that is an ancestor but not the attachment parent
        let mut m: AvlMap<u32, ()> = (0..7).map(|k| (k, ())).collect();
        let i = m.arena.construct(10, ());
        let root = m.root;
        m.insert_node(root, i);
        assert_eq!(m.len(), 8);
        assert_eq!(m.keys().last(), Some(&10));
        m.chk();
    }

    #[test]
    fn tombstones_kept_until_purge() {
        let mut m: AvlMap<u32, u32> = (0..10).map(|k| (k, k * 10)).collect();
        for k in 0..5 {
            m.erase(&k);
        }
        assert_eq!(m.tombstones(), 5);
        assert_eq!(m.arena.occupied(), 10);

        assert_eq!(m.purge_tombstones(), 5);
        assert_eq!(m.tombstones(), 0);
        assert_eq!(m.arena.occupied(), 5);
        m.chk();
    }

    #[test]
    fn on_erase_reclaims_immediately() {
        let cfg = Config::new().with_reclaim(Reclaim::OnErase);
        let mut m = AvlMap::with_config(cfg);
        for k in 0..10u32 {
            m.insert(k, ());
        }
        for k in 0..10 {
            assert_eq!(m.erase(&k), 1);
            m.chk();
        }
        assert_eq!(m.tombstones(), 0);
        assert_eq!(m.arena.occupied(), 0);
    }

    #[test]
    fn clear_destroys_everything() {
        let mut m: AvlMap<u32, String> = (0..100).map(|k| (k, k.to_string())).collect();
        for k in (0..100).step_by(3) {
            m.erase(&k);
        }
        m.clear();
        assert!(m.is_empty());
        assert_eq!(m.arena.occupied(), 0);
        assert_eq!(m.tombstones(), 0);
        assert_eq!(m.begin(), m.end());

        m.insert(5, "five".to_string());
        assert_eq!(m.len(), 1);
        m.chk();
    }

    #[test]
    fn bal_test_regr1() {
        bal_test(vec![(4, 0), (0, 0), (5, 0), (1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn bal_test_regr2() {
        bal_test(vec![(3, 0), (0, 0), (1, 0), (2, 0), (4, 0)]);
    }

    #[test]
    fn rm_test_regr1() {
        rm_test(vec![(101, 0), (100, 0), (1, 0), (-100, 0)]);
    }

    #[test]
    fn rm_test_regr2() {
        rm_test(vec![
            (31, 0),
            (14, 0),
            (1, 0),
            (15, 0),
            (32, 0),
            (16, 0),
            (17, 0),
            (-14, 0),
            (-31, 0),
        ]);
    }

    quickcheck! {
        fn qc_bal_test(vs: Vec<(u8, u32)>) -> () {
            bal_test(vs);
        }

        fn qc_rm_test(vs: Vec<(i8, u32)>) -> () {
            rm_test(vs);
        }
    }
}
