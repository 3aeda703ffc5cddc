//! Iterators over a [`TwoThreeTree`].
//!
//! Borrowing iterators walk the tree lazily through the same successor and
//! predecessor steps that back [`TwoThreeTree::advance`] and
//! [`TwoThreeTree::retreat`], so creating one is O(log N) and each step is
//! O(1) amortized.

use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};

use crate::arena::Handle;
use crate::location::Location;
use crate::ordering::KeyOrder;
use crate::tree::TwoThreeTree;

// =============================================================================
// Iter
// =============================================================================

/// An iterator over the entries of a [`TwoThreeTree`] in key order.
///
/// Created by [`TwoThreeTree::iter`].
pub struct Iter<'a, K, V, O> {
    tree: &'a TwoThreeTree<K, V, O>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, K, V, O> Iter<'a, K, V, O> {
    pub(crate) fn new(tree: &'a TwoThreeTree<K, V, O>) -> Self {
        Self {
            tree,
            front: tree.begin_location().handle(),
            back: tree.end_location().handle(),
            remaining: tree.len(),
        }
    }
}

impl<K, V, O> Clone for Iter<'_, K, V, O> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, K, V, O> Iterator for Iter<'a, K, V, O> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.remaining -= 1;
        self.front = self.tree.successor(handle).handle();
        self.tree.get_handle(handle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, O> DoubleEndedIterator for Iter<'_, K, V, O> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.remaining -= 1;
        self.back = self.tree.predecessor(handle).handle();
        self.tree.get_handle(handle)
    }
}

impl<K, V, O> ExactSizeIterator for Iter<'_, K, V, O> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V, O> FusedIterator for Iter<'_, K, V, O> {}

// =============================================================================
// Range
// =============================================================================

/// An iterator over a contiguous key range of a [`TwoThreeTree`].
///
/// Created by [`TwoThreeTree::range`].
pub struct Range<'a, K, V, O> {
    tree: &'a TwoThreeTree<K, V, O>,
    /// Next handle from each end; `None` once the ends have met.
    ends: Option<(Handle, Handle)>,
}

impl<K, V, O> Clone for Range<'_, K, V, O> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, K, V, O> Iterator for Range<'a, K, V, O> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (front, back) = self.ends?;
        self.ends = if front == back {
            None
        } else {
            self.tree
                .successor(front)
                .handle()
                .map(|next| (next, back))
        };
        self.tree.get_handle(front)
    }
}

impl<K, V, O> DoubleEndedIterator for Range<'_, K, V, O> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (front, back) = self.ends?;
        self.ends = if front == back {
            None
        } else {
            self.tree
                .predecessor(back)
                .handle()
                .map(|previous| (front, previous))
        };
        self.tree.get_handle(back)
    }
}

impl<K, V, O> FusedIterator for Range<'_, K, V, O> {}

impl<K, V, O: KeyOrder<K>> TwoThreeTree<K, V, O> {
    /// Returns an iterator over the entries whose keys fall within `range`,
    /// in key order.
    ///
    /// Bounds are interpreted under the tree's ordering. A range whose start
    /// lies after its end yields nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twothree::TwoThreeTree;
    ///
    /// let tree: TwoThreeTree<i32, i32> = (0..10).map(|key| (key, key * key)).collect();
    ///
    /// let squares: Vec<i32> = tree.range(3..6).map(|(_, value)| *value).collect();
    /// assert_eq!(squares, vec![9, 16, 25]);
    ///
    /// let tail: Vec<i32> = tree.range(8..).rev().map(|(key, _)| *key).collect();
    /// assert_eq!(tail, vec![9, 8]);
    /// ```
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> Range<'_, K, V, O> {
        let front = match range.start_bound() {
            Bound::Included(start) => self.lower_bound(start),
            Bound::Excluded(start) => self.upper_bound(start),
            Bound::Unbounded => self.begin_location(),
        };
        let back = match range.end_bound() {
            Bound::Included(end) => self.step_back(self.upper_bound(end)),
            Bound::Excluded(end) => self.step_back(self.lower_bound(end)),
            Bound::Unbounded => self.end_location(),
        };

        let ends = front.handle().zip(back.handle()).filter(|&(front, back)| {
            match (self.get_handle(front), self.get_handle(back)) {
                (Some((first, _)), Some((last, _))) => !self.order().less(last, first),
                _ => false,
            }
        });
        Range { tree: self, ends }
    }

    fn step_back(&self, location: Location) -> Location {
        match location {
            Location::BeforeFirst => Location::BeforeFirst,
            Location::Entry(handle) => self.predecessor(handle),
            Location::AfterLast => self.end_location(),
        }
    }
}

// =============================================================================
// IntoIter
// =============================================================================

/// An owning iterator over the entries of a [`TwoThreeTree`] in key order.
///
/// Created by [`TwoThreeTree::into_iter`](IntoIterator::into_iter).
#[derive(Debug)]
pub struct IntoIter<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(entries: Vec<(K, V)>) -> Self {
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

#[cfg(test)]
mod tests {
    use crate::TwoThreeTree;
    use rstest::rstest;
    use std::ops::Bound;

    fn tens() -> TwoThreeTree<i32, i32> {
        (1..=9).map(|key| (key * 10, key)).collect()
    }

    fn keys_in<R: std::ops::RangeBounds<i32>>(tree: &TwoThreeTree<i32, i32>, range: R) -> Vec<i32> {
        tree.range(range).map(|(key, _)| *key).collect()
    }

    #[rstest]
    fn test_iter_meets_in_the_middle() {
        let tree = tens();
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 9);
        assert_eq!(iter.next(), Some((&10, &1)));
        assert_eq!(iter.next_back(), Some((&90, &9)));
        assert_eq!(iter.len(), 7);

        let rest: Vec<i32> = iter.map(|(key, _)| *key).collect();
        assert_eq!(rest, vec![20, 30, 40, 50, 60, 70, 80]);
    }

    #[rstest]
    fn test_iter_rev() {
        let tree = tens();
        let keys: Vec<i32> = tree.keys().rev().copied().collect();
        assert_eq!(keys, vec![90, 80, 70, 60, 50, 40, 30, 20, 10]);
    }

    #[rstest]
    #[case::inclusive((Bound::Included(20), Bound::Included(40)), vec![20, 30, 40])]
    #[case::exclusive((Bound::Included(20), Bound::Excluded(40)), vec![20, 30])]
    #[case::between_keys((Bound::Included(15), Bound::Excluded(45)), vec![20, 30, 40])]
    #[case::below_everything((Bound::Included(0), Bound::Excluded(5)), vec![])]
    #[case::above_everything((Bound::Included(95), Bound::Excluded(200)), vec![])]
    #[case::single((Bound::Included(50), Bound::Included(50)), vec![50])]
    #[case::empty_half_open((Bound::Included(50), Bound::Excluded(50)), vec![])]
    fn test_range_bounds(#[case] range: (Bound<i32>, Bound<i32>), #[case] expected: Vec<i32>) {
        assert_eq!(keys_in(&tens(), range), expected);
    }

    #[rstest]
    fn test_range_unbounded_and_excluded_start() {
        let tree = tens();
        assert_eq!(keys_in(&tree, ..), (1..=9).map(|key| key * 10).collect::<Vec<_>>());
        assert_eq!(
            keys_in(&tree, (Bound::Excluded(70), Bound::Unbounded)),
            vec![80, 90]
        );
        assert_eq!(keys_in(&tree, ..=20), vec![10, 20]);
    }

    #[rstest]
    fn test_range_inverted_is_empty() {
        let tree = tens();
        assert_eq!(keys_in(&tree, (Bound::Included(60), Bound::Included(30))), vec![]);
    }

    #[rstest]
    fn test_range_double_ended() {
        let tree = tens();
        let mut range = tree.range(30..=60);
        assert_eq!(range.next_back(), Some((&60, &6)));
        assert_eq!(range.next(), Some((&30, &3)));
        assert_eq!(range.next_back(), Some((&50, &5)));
        assert_eq!(range.next(), Some((&40, &4)));
        assert_eq!(range.next(), None);
        assert_eq!(range.next_back(), None);
    }

    #[rstest]
    fn test_into_iter_from_both_ends() {
        let mut iter = tens().into_iter();
        assert_eq!(iter.len(), 9);
        assert_eq!(iter.next(), Some((10, 1)));
        assert_eq!(iter.next_back(), Some((90, 9)));
        assert_eq!(iter.len(), 7);
    }
}
