use super::{AvlMap, Keys};
use crate::{Compare, Natural};
use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};

/// A sorted set of values.
///
/// The implementation is a thin wrapper around [`AvlMap`] with `()` values.
#[derive(Clone)]
pub struct AvlSet<T, C = Natural> {
    map: AvlMap<T, (), C>,
}

impl<T> AvlSet<T> {
    /// Returns a new, empty set.
    pub fn new() -> Self {
        Self { map: AvlMap::new() }
    }
}

impl<T, C> AvlSet<T, C> {
    /// Returns a new, empty set ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            map: AvlMap::with_comparator(cmp),
        }
    }

    /// Removes all the entries from self.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the least value in the set.
    pub fn first(&self) -> Option<&T> {
        self.map.first_key_value().map(|(k, _)| k)
    }

    /// Returns the greatest value in self.
    pub fn last(&self) -> Option<&T> {
        self.map.last_key_value().map(|e| e.0)
    }

    /// Returns true if self is the empty set, false otherwise.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of elements in self.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns an iterator over self's values in sorted order.
    pub fn iter(&self) -> SetIter<'_, T> {
        SetIter {
            iter: self.map.keys(),
        }
    }
}

impl<T, C: Compare<T>> AvlSet<T, C> {
    /// Tests if self contains the given value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.map.contains(value)
    }

    /// Inserts the given value and returns true if self did not already have
    /// the value and returns false otherwise.
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert(value, ()).1
    }

    /// Removes the given value from self returning true if the value was
    /// present and false otherwise.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.map.remove(value).is_some()
    }
}

impl<T, C: Default> Default for AvlSet<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: Debug, C> Debug for AvlSet<T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C> PartialEq for AvlSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for AvlSet<T, C> {}

impl<T, C: Compare<T>> Extend<T> for AvlSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for x in iter {
            self.insert(x);
        }
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for AvlSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut s = AvlSet::default();
        s.extend(iter);
        s
    }
}

impl<'a, T, C> IntoIterator for &'a AvlSet<T, C> {
    type Item = &'a T;
    type IntoIter = SetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the values of an [`AvlSet`], in sorted order.
pub struct SetIter<'a, T> {
    iter: Keys<'a, T, ()>,
}

impl<'a, T> Clone for SetIter<'a, T> {
    fn clone(&self) -> Self {
        SetIter {
            iter: self.iter.clone(),
        }
    }
}

impl<'a, T> Iterator for SetIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for SetIter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back()
    }
}

impl<'a, T> ExactSizeIterator for SetIter<'a, T> {}

impl<'a, T> std::iter::FusedIterator for SetIter<'a, T> {}
