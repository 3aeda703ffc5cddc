//! Ordered key-value store based on a 2-3 tree.
//!
//! This module provides [`TwoThreeTree`], a mutable ordered map whose entries
//! are addressed by stable [`Handle`]s.
//!
//! # Overview
//!
//! Entries live in a slot arena; the tree orders their handles. Leaves hold
//! one or two handles, internal nodes hold two or three children separated
//! by one or two copies of routing keys. All leaves sit at the same depth.
//!
//! - O(log N) find, insert and delete
//! - O(1) dereference of a handle
//! - O(log N) worst case, O(1) amortized, advance and retreat
//! - O(1) len and `is_empty`
//!
//! Because entries never move between arena slots, a [`Handle`] returned by
//! [`insert`](TwoThreeTree::insert) keeps naming the same entry however much
//! the tree is restructured around it, until that entry itself is deleted.
//!
//! # Examples
//!
//! ```rust
//! use twothree::{Location, TwoThreeTree};
//!
//! let mut tree = TwoThreeTree::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     tree.insert(key, key * 10);
//! }
//!
//! let keys: Vec<i32> = tree.keys().copied().collect();
//! assert_eq!(keys, vec![1, 3, 4, 5, 7, 8, 9]);
//!
//! let five = tree.find(&5).handle().unwrap();
//! assert_eq!(tree.delete(five), Some((5, 50)));
//! assert_eq!(tree.len(), 6);
//! ```
//!
//! # Internal Structure
//!
//! The tree maintains the following invariants after every operation:
//! 1. Every leaf is at depth `height`
//! 2. Every non-root leaf holds 1 or 2 entries; the root leaf holds 0 to 2
//! 3. Every internal node holds 2 or 3 children and one separator fewer
//! 4. Keys under child `i` are `<= separators[i]` and `> separators[i - 1]`
//! 5. Every entry records the leaf holding its handle
//!
//! Separators are copies of keys, so they may outlive the entry they were
//! copied from; only the bounds in invariant 4 matter for routing.

mod delete;
mod insert;
mod invariants;
mod navigate;
mod node;
mod search;

pub(crate) use node::NodeId;
pub use search::Search;

use std::fmt;

use arrayvec::ArrayVec;
use tracing::trace;

use crate::arena::{EntryArena, Handle};
use crate::iter::{IntoIter, Iter};
use crate::ordering::{Ascending, KeyOrder};
use node::{Node, NodeArena};

// =============================================================================
// TwoThreeTree Definition
// =============================================================================

/// An ordered map built on a 2-3 tree with stable entry handles.
///
/// The ordering is a [`KeyOrder`] value bound at construction; it defaults
/// to [`Ascending`]. Keys must be `Clone` for mutation because internal
/// nodes keep copies of keys as separators.
///
/// # Time Complexity
///
/// | Operation            | Complexity        |
/// |----------------------|-------------------|
/// | `new`                | O(1)              |
/// | `find`/`get`         | O(log N)          |
/// | `insert`             | O(log N)          |
/// | `delete`             | O(log N)          |
/// | `dereference`        | O(1)              |
/// | `advance`/`retreat`  | O(log N), O(1) amortized |
/// | `len`                | O(1)              |
///
/// # Examples
///
/// ```rust
/// use twothree::TwoThreeTree;
/// use twothree::ordering::Descending;
///
/// let mut tree = TwoThreeTree::with_order(Descending);
/// tree.insert(1, "one");
/// tree.insert(3, "three");
/// tree.insert(2, "two");
///
/// let keys: Vec<&i32> = tree.keys().collect();
/// assert_eq!(keys, vec![&3, &2, &1]);
/// ```
#[derive(Clone)]
pub struct TwoThreeTree<K, V, O = Ascending> {
    entries: EntryArena<K, V>,
    nodes: NodeArena<K>,
    root: NodeId,
    /// Number of edges between the root and any leaf.
    height: usize,
    order: O,
}

impl<K, V> TwoThreeTree<K, V> {
    /// Creates an empty tree in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twothree::TwoThreeTree;
    ///
    /// let tree: TwoThreeTree<i32, String> = TwoThreeTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_order(Ascending)
    }

    /// Creates an empty tree in ascending key order with room for
    /// `capacity` entries before the arenas reallocate.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_order(capacity, Ascending)
    }
}

impl<K, V, O> TwoThreeTree<K, V, O> {
    /// Creates an empty tree permanently bound to `order`.
    #[must_use]
    pub fn with_order(order: O) -> Self {
        Self::from_parts(EntryArena::new(), NodeArena::new(), order)
    }

    /// Creates an empty tree bound to `order` with room for `capacity`
    /// entries before the arenas reallocate.
    #[must_use]
    pub fn with_capacity_and_order(capacity: usize, order: O) -> Self {
        // A full 2-3 tree needs at most one node per entry.
        Self::from_parts(
            EntryArena::with_capacity(capacity),
            NodeArena::with_capacity(capacity),
            order,
        )
    }

    fn from_parts(entries: EntryArena<K, V>, mut nodes: NodeArena<K>, order: O) -> Self {
        let root = nodes.allocate(Node::leaf(None, ArrayVec::new()));
        Self {
            entries,
            nodes,
            root,
            height: 0,
            order,
        }
    }

    /// Returns the number of entries.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of entries; an alias of [`len`](Self::len).
    #[inline]
    #[must_use]
    pub const fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    /// Returns the number of edges from the root to any leaf.
    ///
    /// An empty tree and a tree whose root is a leaf both have height 0.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the ordering policy this tree is bound to.
    #[inline]
    #[must_use]
    pub const fn order(&self) -> &O {
        &self.order
    }

    /// Removes every entry.
    ///
    /// Handles issued before the clear become stale; they never resolve to
    /// entries inserted afterwards.
    pub fn clear(&mut self) {
        let released = self.entries.len();
        self.entries.clear();
        self.nodes.clear();
        self.root = self.nodes.allocate(Node::leaf(None, ArrayVec::new()));
        self.height = 0;
        trace!(released, "cleared tree");
    }

    /// Returns the entry behind `handle`, or `None` if it has been deleted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twothree::TwoThreeTree;
    ///
    /// let mut tree = TwoThreeTree::new();
    /// let (handle, _) = tree.insert("key", 1);
    /// assert_eq!(tree.get_handle(handle), Some((&"key", &1)));
    ///
    /// tree.delete(handle);
    /// assert_eq!(tree.get_handle(handle), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn get_handle(&self, handle: Handle) -> Option<(&K, &V)> {
        self.entries
            .get(handle)
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Returns `true` if `handle` names a live entry of this tree.
    #[inline]
    #[must_use]
    pub fn contains_handle(&self, handle: Handle) -> bool {
        self.entries.contains(handle)
    }

    /// Replaces the value behind `handle` and returns the previous value.
    ///
    /// # Errors
    ///
    /// Returns the new value back as `Err` if the handle is stale.
    pub fn set_value(&mut self, handle: Handle, value: V) -> Result<V, V> {
        self.entries.set_value(handle, value)
    }

    /// Returns an iterator over entries in key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twothree::TwoThreeTree;
    ///
    /// let tree: TwoThreeTree<i32, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
    /// let entries: Vec<(&i32, &char)> = tree.iter().collect();
    /// assert_eq!(entries, vec![(&1, &'a'), (&2, &'b')]);
    /// ```
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, O> {
        Iter::new(self)
    }

    /// Returns an iterator over keys in order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, value)| value)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, O: Default> Default for TwoThreeTree<K, V, O> {
    #[inline]
    fn default() -> Self {
        Self::with_order(O::default())
    }
}

impl<K, V, O> FromIterator<(K, V)> for TwoThreeTree<K, V, O>
where
    K: Clone,
    O: KeyOrder<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<K, V, O> Extend<(K, V)> for TwoThreeTree<K, V, O>
where
    K: Clone,
    O: KeyOrder<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, O> IntoIterator for TwoThreeTree<K, V, O> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let handles: Vec<Handle> = self.handles_in_order().collect();
        let entries: Vec<(K, V)> = handles
            .into_iter()
            .filter_map(|handle| self.entries.retire(handle))
            .map(|entry| (entry.key, entry.value))
            .collect();
        IntoIter::new(entries)
    }
}

impl<'a, K, V, O> IntoIterator for &'a TwoThreeTree<K, V, O> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, O>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Two trees are equal when they hold pairwise equivalent keys, in the same
/// order, with equal values.
impl<K, V: PartialEq, O: KeyOrder<K>> PartialEq for TwoThreeTree<K, V, O> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((key, value), (other_key, other_value))| {
                    self.order.equivalent(key, other_key) && value == other_value
                })
    }
}

impl<K, V: Eq, O: KeyOrder<K>> Eq for TwoThreeTree<K, V, O> {}

impl<K: fmt::Debug, V: fmt::Debug, O> fmt::Debug for TwoThreeTree<K, V, O> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, O> serde::Serialize for TwoThreeTree<K, V, O>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct TwoThreeTreeVisitor<K, V, O> {
    marker: std::marker::PhantomData<fn() -> TwoThreeTree<K, V, O>>,
}

#[cfg(feature = "serde")]
impl<K, V, O> TwoThreeTreeVisitor<K, V, O> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, O> serde::de::Visitor<'de> for TwoThreeTreeVisitor<K, V, O>
where
    K: serde::Deserialize<'de> + Clone,
    V: serde::Deserialize<'de>,
    O: KeyOrder<K> + Default,
{
    type Value = TwoThreeTree<K, V, O>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut tree = TwoThreeTree::with_capacity_and_order(
            access.size_hint().unwrap_or(0),
            O::default(),
        );
        while let Some((key, value)) = access.next_entry()? {
            tree.insert(key, value);
        }
        Ok(tree)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, O> serde::Deserialize<'de> for TwoThreeTree<K, V, O>
where
    K: serde::Deserialize<'de> + Clone,
    V: serde::Deserialize<'de>,
    O: KeyOrder<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(TwoThreeTreeVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
