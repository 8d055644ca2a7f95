use thiserror::Error;

/// Failures reported by the map's accessors.
///
/// Only accessors that require the key to be present ([`AvlMap::at`] and
/// [`AvlMap::at_mut`]) fail; every other lookup reports absence through
/// `None`, `false`, `0` or the end cursor.
///
/// [`AvlMap::at`]: crate::AvlMap::at
/// [`AvlMap::at_mut`]: crate::AvlMap::at_mut
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested key is not in the map.
    #[error("key not found")]
    NotFound,
}
