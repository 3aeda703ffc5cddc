//! Key-driven descent from the root to a leaf.

use std::cmp::Ordering;

use super::{NodeId, TwoThreeTree};
use crate::arena::Handle;
use crate::location::Location;
use crate::ordering::KeyOrder;

/// Outcome of [`TwoThreeTree::find`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Search {
    /// An entry with an equivalent key exists.
    Found(Handle),
    /// No equivalent key exists. `successor` is the first entry ordered
    /// after the key (the position an insert would place it before), or
    /// [`Location::AfterLast`].
    Missing {
        /// Where the key would be inserted before.
        successor: Location,
    },
}

impl Search {
    /// Returns the matching handle, if any.
    #[inline]
    #[must_use]
    pub const fn handle(self) -> Option<Handle> {
        match self {
            Self::Found(handle) => Some(handle),
            Self::Missing { .. } => None,
        }
    }

    /// Returns `true` for an exact match.
    #[inline]
    #[must_use]
    pub const fn is_found(self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns the matching entry's location, or the insertion successor.
    #[inline]
    #[must_use]
    pub const fn location(self) -> Location {
        match self {
            Self::Found(handle) => Location::Entry(handle),
            Self::Missing { successor } => successor,
        }
    }
}

impl<K, V, O: KeyOrder<K>> TwoThreeTree<K, V, O> {
    /// Descends to the leaf whose separator range covers `key`.
    pub(crate) fn leaf_for(&self, key: &K) -> NodeId {
        let mut current = self.root;
        loop {
            let node = self.nodes.get(current);
            if node.is_leaf() {
                return current;
            }
            let separators = node.separators();
            let slot = separators
                .iter()
                .position(|separator| !self.order.less(separator, key))
                .unwrap_or(separators.len());
            current = node.children()[slot];
        }
    }

    /// Position of `key` within `leaf`: `Ok` for an equivalent entry,
    /// `Err` for the slot it would be inserted at.
    pub(crate) fn position_in_leaf(&self, leaf: NodeId, key: &K) -> Result<usize, usize> {
        let entries = self.nodes.get(leaf).entries();
        for (slot, &handle) in entries.iter().enumerate() {
            match self.order.compare(key, &self.entries.resident(handle).key) {
                Ordering::Less => return Err(slot),
                Ordering::Equal => return Ok(slot),
                Ordering::Greater => {}
            }
        }
        Err(entries.len())
    }

    /// Looks up `key`.
    ///
    /// Returns the handle of the entry with an equivalent key, or the
    /// location the key would be inserted before.
    ///
    /// # Complexity
    ///
    /// O(log N) comparisons
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twothree::{Location, Search, TwoThreeTree};
    ///
    /// let mut tree = TwoThreeTree::new();
    /// let (ten, _) = tree.insert(10, "ten");
    /// let (thirty, _) = tree.insert(30, "thirty");
    ///
    /// assert_eq!(tree.find(&10), Search::Found(ten));
    /// assert_eq!(tree.find(&20), Search::Missing { successor: Location::Entry(thirty) });
    /// assert_eq!(tree.find(&40), Search::Missing { successor: Location::AfterLast });
    /// ```
    #[must_use]
    pub fn find(&self, key: &K) -> Search {
        let leaf = self.leaf_for(key);
        match self.position_in_leaf(leaf, key) {
            Ok(slot) => Search::Found(self.nodes.get(leaf).entries()[slot]),
            Err(slot) => Search::Missing {
                successor: self.location_in(leaf, slot),
            },
        }
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twothree::TwoThreeTree;
    ///
    /// let mut tree = TwoThreeTree::new();
    /// tree.insert("hello".to_string(), 42);
    ///
    /// assert_eq!(tree.get(&"hello".to_string()), Some(&42));
    /// assert_eq!(tree.get(&"world".to_string()), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key)
            .handle()
            .and_then(|handle| self.entries.get(handle))
            .map(|entry| &entry.value)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let handle = self.find(key).handle()?;
        self.entries.get_mut(handle).map(|entry| &mut entry.value)
    }

    /// Returns the stored key and value equivalent to `key`.
    ///
    /// The returned key is the one stored in the tree, which may differ
    /// from `key` under a custom ordering.
    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key)
            .handle()
            .and_then(|handle| self.get_handle(handle))
    }

    /// Returns `true` if an entry with an equivalent key exists.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_found()
    }

    /// Returns the first location whose key is not less than `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twothree::TwoThreeTree;
    ///
    /// let tree: TwoThreeTree<i32, ()> = [(10, ()), (20, ())].into_iter().collect();
    ///
    /// assert_eq!(tree.dereference(tree.lower_bound(&10)).unwrap().0, &10);
    /// assert_eq!(tree.dereference(tree.lower_bound(&15)).unwrap().0, &20);
    /// assert!(tree.lower_bound(&25).is_sentinel());
    /// ```
    #[must_use]
    pub fn lower_bound(&self, key: &K) -> Location {
        self.find(key).location()
    }

    /// Returns the first location whose key is greater than `key`.
    #[must_use]
    pub fn upper_bound(&self, key: &K) -> Location {
        match self.find(key) {
            Search::Found(handle) => self.successor(handle),
            Search::Missing { successor } => successor,
        }
    }
}
