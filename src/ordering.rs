//! Pluggable key ordering.
//!
//! Every comparison a [`TwoThreeTree`](crate::TwoThreeTree) performs goes
//! through a [`KeyOrder`] value fixed at construction time. The tree never
//! looks at keys any other way, so any strict weak ordering works: natural
//! order, reversed order, or an arbitrary comparison function.
//!
//! # Examples
//!
//! ```rust
//! use twothree::ordering::{Ascending, Comparator, Descending, KeyOrder};
//!
//! assert!(Ascending.less(&1, &2));
//! assert!(Descending.less(&2, &1));
//!
//! let by_length = Comparator::new(|left: &&str, right: &&str| left.len().cmp(&right.len()));
//! assert!(by_length.equivalent(&"abc", &"xyz"));
//! ```

use std::cmp::Ordering;
use std::fmt;

/// A strict weak ordering over keys.
///
/// Implementors only have to provide [`less`](KeyOrder::less); the other
/// predicates are derived from it. Types that can answer a three-way
/// comparison in one step should override [`compare`](KeyOrder::compare).
///
/// The ordering must stay consistent for the whole lifetime of the tree it
/// is bound to. Two keys for which neither is less than the other are
/// *equivalent* and occupy the same entry.
pub trait KeyOrder<K: ?Sized> {
    /// Returns `true` if `left` sorts strictly before `right`.
    fn less(&self, left: &K, right: &K) -> bool;

    /// Returns `true` if neither key sorts before the other.
    #[inline]
    fn equivalent(&self, left: &K, right: &K) -> bool {
        self.compare(left, right) == Ordering::Equal
    }

    /// Three-way comparison derived from [`less`](KeyOrder::less).
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        if self.less(left, right) {
            Ordering::Less
        } else if self.less(right, left) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

// =============================================================================
// Built-in Orders
// =============================================================================

/// Natural ascending order of [`Ord`] keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ascending;

impl<K: Ord + ?Sized> KeyOrder<K> for Ascending {
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        left < right
    }

    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        left.cmp(right)
    }
}

/// Reverse of the natural order of [`Ord`] keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Descending;

impl<K: Ord + ?Sized> KeyOrder<K> for Descending {
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        right < left
    }

    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        right.cmp(left)
    }
}

/// Order defined by a three-way comparison function.
///
/// # Examples
///
/// ```rust
/// use twothree::TwoThreeTree;
/// use twothree::ordering::Comparator;
///
/// let case_insensitive = Comparator::new(|left: &String, right: &String| {
///     left.to_lowercase().cmp(&right.to_lowercase())
/// });
/// let mut tree = TwoThreeTree::with_order(case_insensitive);
/// tree.insert("Apple".to_string(), 1);
/// let (_, inserted) = tree.insert("APPLE".to_string(), 2);
///
/// assert!(!inserted);
/// assert_eq!(tree.len(), 1);
/// ```
#[derive(Clone, Copy)]
pub struct Comparator<F> {
    compare: F,
}

impl<F> Comparator<F> {
    /// Wraps a comparison function.
    #[inline]
    pub const fn new(compare: F) -> Self {
        Self { compare }
    }
}

impl<K: ?Sized, F> KeyOrder<K> for Comparator<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        (self.compare)(left, right) == Ordering::Less
    }

    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        (self.compare)(left, right)
    }
}

impl<F> fmt::Debug for Comparator<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Comparator").finish_non_exhaustive()
    }
}

/// Order defined by a "less than" predicate.
///
/// Each three-way comparison costs up to two predicate calls; prefer
/// [`Comparator`] when a full comparison is available.
#[derive(Clone, Copy)]
pub struct LessThan<F> {
    less: F,
}

impl<F> LessThan<F> {
    /// Wraps a strict "less than" predicate.
    #[inline]
    pub const fn new(less: F) -> Self {
        Self { less }
    }
}

impl<K: ?Sized, F> KeyOrder<K> for LessThan<F>
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        (self.less)(left, right)
    }
}

impl<F> fmt::Debug for LessThan<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("LessThan").finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
