use std::iter::FusedIterator;

use super::node::{Arena, Link, Node};
use super::AvlMap;
use crate::Compare;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Pos {
    slot: usize,
    gen: u64,
}

/// A position in an [`AvlMap`]: an entry, or the end of the map.
///
/// A cursor is a plain handle.  It does not borrow the map, so it can be kept
/// while the map is modified and passed back to the map's cursor methods
/// ([`key_value`](AvlMap::key_value), [`next`](AvlMap::next),
/// [`erase_at`](AvlMap::erase_at), ...).  Two cursors are equal when they
/// designate the same node, or are both the end.
///
/// When the entry behind a cursor is erased the cursor designates a
/// tombstone: [`is_live`](AvlMap::is_live) turns false but the key and value
/// stay readable until the map releases the tombstone (see
/// [`Reclaim`](crate::Reclaim)).  After that the cursor is invalid and reads
/// as `None`.  A cursor is only meaningful for the map that produced it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    pos: Option<Pos>,
}

impl Cursor {
    pub(super) const END: Cursor = Cursor { pos: None };

    pub(super) fn new(slot: usize, gen: u64) -> Self {
        Cursor {
            pos: Some(Pos { slot, gen }),
        }
    }

    /// Is this the end cursor?
    pub fn is_end(&self) -> bool {
        self.pos.is_none()
    }
}

impl<K, V, C> AvlMap<K, V, C> {
    /// A cursor to the least entry, or [`end`](Self::end) if the map is
    /// empty.
    pub fn begin(&self) -> Cursor {
        self.cursor(self.root.map(|r| self.arena.min(r)))
    }

    /// The cursor one past the greatest entry.
    pub fn end(&self) -> Cursor {
        Cursor::END
    }

    // The slot and node behind c, unless c is the end or stale.
    fn resolve(&self, c: Cursor) -> Option<(usize, &Node<K, V>)> {
        let Pos { slot, gen } = c.pos?;
        self.arena.resolve(slot, gen).map(|n| (slot, n))
    }

    fn live_slot(&self, c: Cursor) -> Link {
        self.resolve(c).filter(|(_, n)| !n.deleted).map(|(i, _)| i)
    }

    /// Does `c` designate the end, a live entry, or a tombstone that has not
    /// been released?
    pub fn is_valid(&self, c: Cursor) -> bool {
        c.is_end() || self.resolve(c).is_some()
    }

    /// Does `c` designate an entry that is in the map?
    pub fn is_live(&self, c: Cursor) -> bool {
        self.live_slot(c).is_some()
    }

    /// Does `c` designate an erased entry whose storage is still held?
    pub fn is_tombstone(&self, c: Cursor) -> bool {
        self.resolve(c).is_some_and(|(_, n)| n.deleted)
    }

    /// The key and value behind `c`.
    ///
    /// Returns `None` for the end and for invalid cursors.  A tombstone still
    /// yields the key and value it had when it was erased.
    ///
    /// # Examples
    /// ```
    /// use avl_cursor_map::AvlMap;
    ///
    /// let mut m = AvlMap::from([(1, "a"), (2, "b")]);
    /// let c = m.find(&1);
    /// m.erase(&1);
    /// assert!(!m.is_live(c));
    /// assert_eq!(m.key_value(c), Some((&1, &"a")));
    /// ```
    pub fn key_value(&self, c: Cursor) -> Option<(&K, &V)> {
        self.resolve(c).map(|(_, n)| (&n.key, &n.val))
    }

    /// A mutable reference to the value behind `c`, if `c` designates a live
    /// entry.
    pub fn value_mut(&mut self, c: Cursor) -> Option<&mut V> {
        let Pos { slot, gen } = c.pos?;
        self.arena
            .resolve_mut(slot, gen)
            .filter(|n| !n.deleted)
            .map(|n| &mut n.val)
    }
}

impl<K, V, C: Compare<K>> AvlMap<K, V, C> {
    /// Steps `c` to the next entry in key order.
    ///
    /// The step after the greatest entry is [`end`](Self::end), and the end
    /// stays at the end.  From a tombstone the step goes to the least live
    /// entry after the tombstone's key.  Invalid cursors step to the end.
    pub fn next(&self, c: Cursor) -> Cursor {
        match self.resolve(c) {
            Some((i, n)) if !n.deleted => self.cursor(self.arena.successor(i)),
            Some((_, n)) => self.cursor(self.first_after(&n.key)),
            None => Cursor::END,
        }
    }

    /// Steps `c` to the previous entry in key order.
    ///
    /// The step before the least entry is [`end`](Self::end); the step
    /// before the end is the greatest entry.  From a tombstone the step goes
    /// to the greatest live entry before the tombstone's key.  Invalid
    /// cursors step to the end.
    pub fn prev(&self, c: Cursor) -> Cursor {
        if c.is_end() {
            return self.cursor(self.root.map(|r| self.arena.max(r)));
        }

        match self.resolve(c) {
            Some((i, n)) if !n.deleted => self.cursor(self.arena.predecessor(i)),
            Some((_, n)) => self.cursor(self.last_before(&n.key)),
            None => Cursor::END,
        }
    }

    /// Erases the entry behind `c` and returns a cursor to the entry that
    /// followed it.
    ///
    /// The successor is located before anything is unlinked, so this is the
    /// way to erase while walking the map.  Given the end, a tombstone or an
    /// invalid cursor, nothing is erased and the result is `self.next(c)`.
    ///
    /// # Examples
    /// ```
    /// use avl_cursor_map::AvlMap;
    ///
    /// let mut m: AvlMap<u32, ()> = (0..10).map(|k| (k, ())).collect();
    /// let mut c = m.begin();
    /// while let Some((&k, _)) = m.key_value(c) {
    ///     c = if k % 2 == 0 { m.erase_at(c) } else { m.next(c) };
    /// }
    /// assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![1, 3, 5, 7, 9]);
    /// ```
    pub fn erase_at(&mut self, c: Cursor) -> Cursor {
        let next = self.next(c);
        if let Some(i) = self.live_slot(c) {
            self.erase_node(i);
        }
        next
    }
}

/// An iterator over the entries of an [`AvlMap`], in key order.
pub struct Iter<'a, K, V> {
    arena: &'a Arena<K, V>,
    front: Link,
    back: Link,
    len: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(arena: &'a Arena<K, V>, front: Link, back: Link, len: usize) -> Self {
        Iter {
            arena,
            front,
            back,
            len,
        }
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter {
            arena: self.arena,
            front: self.front,
            back: self.back,
            len: self.len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let i = self.front?;
        self.len -= 1;
        self.front = self.arena.successor(i);
        let arena = self.arena;
        let n = &arena[i];
        Some((&n.key, &n.val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let i = self.back?;
        self.len -= 1;
        self.back = self.arena.predecessor(i);
        let arena = self.arena;
        let n = &arena[i];
        Some((&n.key, &n.val))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

/// An iterator over the keys of an [`AvlMap`], in order.
pub struct Keys<'a, K, V>(pub(super) Iter<'a, K, V>);

impl<'a, K, V> Clone for Keys<'a, K, V> {
    fn clone(&self) -> Self {
        Keys(self.0.clone())
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|p| p.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|p| p.0)
    }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}

impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}

/// An iterator over the values of an [`AvlMap`], ordered by key.
pub struct Values<'a, K, V>(pub(super) Iter<'a, K, V>);

impl<'a, K, V> Clone for Values<'a, K, V> {
    fn clone(&self) -> Self {
        Values(self.0.clone())
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|p| p.1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|p| p.1)
    }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}

impl<'a, K, V> FusedIterator for Values<'a, K, V> {}
