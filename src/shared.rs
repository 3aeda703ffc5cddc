//! A tree shared between threads behind a reader-writer lock.
//!
//! [`TwoThreeTree`] itself does no locking. [`SharedTree`] adds the usual
//! discipline on top: any number of concurrent readers, or one writer.
//! Handles obtained under one guard can be kept and checked under a later
//! guard; a handle whose entry was deleted in between is reported as stale,
//! never confused with a newer entry.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ordering::Ascending;
use crate::tree::TwoThreeTree;

/// A cloneable, thread-safe handle to a [`TwoThreeTree`].
///
/// Cloning a `SharedTree` clones the reference, not the tree.
///
/// # Examples
///
/// ```rust
/// use std::thread;
/// use twothree::SharedTree;
///
/// let shared: SharedTree<u32, u32> = SharedTree::default();
/// let workers: Vec<_> = (0..4)
///     .map(|worker| {
///         let shared = shared.clone();
///         thread::spawn(move || {
///             for key in 0..25 {
///                 shared.write().insert(worker * 100 + key, key);
///             }
///         })
///     })
///     .collect();
/// for worker in workers {
///     worker.join().unwrap();
/// }
///
/// assert_eq!(shared.len(), 100);
/// assert!(shared.read().check_invariants().is_ok());
/// ```
pub struct SharedTree<K, V, O = Ascending> {
    inner: Arc<RwLock<TwoThreeTree<K, V, O>>>,
}

impl<K, V, O> SharedTree<K, V, O> {
    /// Wraps `tree` for shared use.
    #[must_use]
    pub fn new(tree: TwoThreeTree<K, V, O>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Acquires shared read access, blocking while a writer holds the lock.
    pub fn read(&self) -> RwLockReadGuard<'_, TwoThreeTree<K, V, O>> {
        self.inner.read()
    }

    /// Acquires exclusive write access, blocking until all other guards are
    /// released.
    pub fn write(&self) -> RwLockWriteGuard<'_, TwoThreeTree<K, V, O>> {
        self.inner.write()
    }

    /// Attempts to acquire read access without blocking.
    pub fn try_read(&self) -> Option<RwLockReadGuard<'_, TwoThreeTree<K, V, O>>> {
        self.inner.try_read()
    }

    /// Attempts to acquire write access without blocking.
    pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, TwoThreeTree<K, V, O>>> {
        self.inner.try_write()
    }

    /// Returns the number of entries at the time of the call.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the tree held no entries at the time of the call.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Unwraps the tree if this is the last reference to it.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged while other clones are alive.
    pub fn into_inner(self) -> Result<TwoThreeTree<K, V, O>, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<K, V, O> Clone for SharedTree<K, V, O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, O: Default> Default for SharedTree<K, V, O> {
    fn default() -> Self {
        Self::new(TwoThreeTree::default())
    }
}

impl<K, V, O> From<TwoThreeTree<K, V, O>> for SharedTree<K, V, O> {
    fn from(tree: TwoThreeTree<K, V, O>) -> Self {
        Self::new(tree)
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug, O> std::fmt::Debug for SharedTree<K, V, O> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_read() {
            Some(tree) => formatter.debug_tuple("SharedTree").field(&*tree).finish(),
            None => formatter.write_str("SharedTree(<locked>)"),
        }
    }
}

static_assertions::assert_impl_all!(SharedTree<String, Vec<u8>>: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_clones_share_one_tree() {
        let shared: SharedTree<i32, &str> = SharedTree::default();
        let other = shared.clone();
        other.write().insert(1, "one");
        assert_eq!(shared.read().get(&1), Some(&"one"));
        assert_eq!(shared.len(), 1);
    }

    #[rstest]
    fn test_try_write_fails_while_reading() {
        let shared: SharedTree<i32, i32> = SharedTree::default();
        let guard = shared.read();
        assert!(shared.try_write().is_none());
        assert!(shared.try_read().is_some());
        drop(guard);
        assert!(shared.try_write().is_some());
    }

    #[rstest]
    fn test_into_inner_requires_last_reference() {
        let shared = SharedTree::from(TwoThreeTree::<i32, i32>::new());
        let other = shared.clone();
        let shared = shared.into_inner().unwrap_err();
        drop(other);
        assert!(shared.into_inner().is_ok());
    }

    #[rstest]
    fn test_debug_shows_entries() {
        let shared: SharedTree<i32, i32> = [(1, 2)].into_iter().collect::<TwoThreeTree<_, _>>().into();
        assert_eq!(format!("{shared:?}"), "SharedTree({1: 2})");
    }
}
