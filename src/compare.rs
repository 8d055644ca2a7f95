use std::cmp::Ordering;

/// A total order over `T`, supplied by the map's owner.
///
/// The map calls `compare` for every key comparison, so the order must be
/// consistent for as long as the keys are in the map.  Changing the relative
/// order of stored keys is a logic error: the map will not panic or leak, but
/// lookups may miss entries.
///
/// Any `Fn(&T, &T) -> Ordering` is a comparator:
/// ```
/// use avl_cursor_map::AvlMap;
///
/// let mut m = AvlMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// m.insert(1, ());
/// m.insert(2, ());
/// assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![2, 1]);
/// ```
pub trait Compare<T: ?Sized> {
    /// Compares `lhs` to `rhs`.
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering;
}

/// The order given by `T`'s [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        lhs.cmp(rhs)
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        self(lhs, rhs)
    }
}
