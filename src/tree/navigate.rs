//! In-order navigation between entries.
//!
//! Stepping within a leaf is a slot lookup. Stepping past the end of a leaf
//! climbs parent links until an ancestor has a sibling in the wanted
//! direction, then descends that sibling's outer spine. The climb is
//! O(height) but a full traversal touches every edge twice, so each step
//! costs O(1) amortized.

use super::{NodeId, TwoThreeTree};
use crate::arena::Handle;
use crate::error::LocationError;
use crate::location::{Location, Sentinel};

impl<K, V, O> TwoThreeTree<K, V, O> {
    // =========================================================================
    // Structural Helpers
    // =========================================================================

    fn leftmost_leaf(&self, mut node: NodeId) -> NodeId {
        while let Some(&first) = self.nodes.get(node).children().first() {
            node = first;
        }
        node
    }

    fn rightmost_leaf(&self, mut node: NodeId) -> NodeId {
        while let Some(&last) = self.nodes.get(node).children().last() {
            node = last;
        }
        node
    }

    fn next_leaf(&self, leaf: NodeId) -> Option<NodeId> {
        let mut current = leaf;
        while let Some((parent, slot)) = self.nodes.slot_in_parent(current) {
            if let Some(&sibling) = self.nodes.get(parent).children().get(slot + 1) {
                return Some(self.leftmost_leaf(sibling));
            }
            current = parent;
        }
        None
    }

    fn previous_leaf(&self, leaf: NodeId) -> Option<NodeId> {
        let mut current = leaf;
        while let Some((parent, slot)) = self.nodes.slot_in_parent(current) {
            if let Some(sibling) = slot.checked_sub(1) {
                return Some(self.rightmost_leaf(self.nodes.get(parent).children()[sibling]));
            }
            current = parent;
        }
        None
    }

    /// Location of `slot` within `leaf`, spilling over to the next leaf when
    /// `slot` is one past the leaf's last entry.
    pub(crate) fn location_in(&self, leaf: NodeId, slot: usize) -> Location {
        if let Some(&handle) = self.nodes.get(leaf).entries().get(slot) {
            return Location::Entry(handle);
        }
        self.next_leaf(leaf)
            .and_then(|next| self.nodes.get(next).entries().first().copied())
            .map_or(Location::AfterLast, Location::Entry)
    }

    /// In-order successor of a live handle.
    pub(crate) fn successor(&self, handle: Handle) -> Location {
        let leaf = self.entries.resident(handle).leaf;
        let slot = self
            .nodes
            .get(leaf)
            .entries()
            .iter()
            .position(|&candidate| candidate == handle)
            .map_or(0, |slot| slot + 1);
        self.location_in(leaf, slot)
    }

    /// In-order predecessor of a live handle.
    pub(crate) fn predecessor(&self, handle: Handle) -> Location {
        let leaf = self.entries.resident(handle).leaf;
        let entries = self.nodes.get(leaf).entries();
        let slot = entries.iter().position(|&candidate| candidate == handle);
        if let Some(&previous) = slot
            .and_then(|slot| slot.checked_sub(1))
            .and_then(|previous| entries.get(previous))
        {
            return Location::Entry(previous);
        }
        self.previous_leaf(leaf)
            .and_then(|previous| self.nodes.get(previous).entries().last().copied())
            .map_or(Location::BeforeFirst, Location::Entry)
    }

    /// Every live handle, in key order.
    pub(crate) fn handles_in_order(&self) -> impl Iterator<Item = Handle> + '_ {
        std::iter::successors(self.begin_location().handle(), |&handle| {
            self.successor(handle).handle()
        })
    }

    fn ensure_live(&self, handle: Handle) -> Result<(), LocationError> {
        if self.entries.contains(handle) {
            Ok(())
        } else {
            Err(LocationError::Stale(handle))
        }
    }

    // =========================================================================
    // Public Navigation
    // =========================================================================

    /// Returns the location of the first entry, or
    /// [`Location::AfterLast`] if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twothree::{Location, TwoThreeTree};
    ///
    /// let mut tree = TwoThreeTree::new();
    /// assert_eq!(tree.begin_location(), Location::AfterLast);
    ///
    /// let (handle, _) = tree.insert(1, "one");
    /// assert_eq!(tree.begin_location(), Location::Entry(handle));
    /// ```
    #[must_use]
    pub fn begin_location(&self) -> Location {
        self.nodes
            .get(self.leftmost_leaf(self.root))
            .entries()
            .first()
            .copied()
            .map_or(Location::AfterLast, Location::Entry)
    }

    /// Returns the location of the last entry, or
    /// [`Location::BeforeFirst`] if the tree is empty.
    #[must_use]
    pub fn end_location(&self) -> Location {
        self.nodes
            .get(self.rightmost_leaf(self.root))
            .entries()
            .last()
            .copied()
            .map_or(Location::BeforeFirst, Location::Entry)
    }

    /// Returns the in-order successor of `location`.
    ///
    /// Advancing from the last entry yields [`Location::AfterLast`];
    /// advancing from `BeforeFirst` yields the first entry; advancing from
    /// `AfterLast` yields `AfterLast` again.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Stale`] if the location's entry was deleted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twothree::{Location, TwoThreeTree};
    ///
    /// let tree: TwoThreeTree<i32, ()> = [(1, ()), (2, ())].into_iter().collect();
    ///
    /// let first = tree.advance(Location::BeforeFirst).unwrap();
    /// let second = tree.advance(first).unwrap();
    /// assert_eq!(tree.dereference(second).unwrap().0, &2);
    /// assert_eq!(tree.advance(second), Ok(Location::AfterLast));
    /// assert_eq!(tree.advance(Location::AfterLast), Ok(Location::AfterLast));
    /// ```
    pub fn advance(&self, location: Location) -> Result<Location, LocationError> {
        match location {
            Location::BeforeFirst => Ok(self.begin_location()),
            Location::AfterLast => Ok(Location::AfterLast),
            Location::Entry(handle) => {
                self.ensure_live(handle)?;
                Ok(self.successor(handle))
            }
        }
    }

    /// Returns the in-order predecessor of `location`.
    ///
    /// The exact inverse of [`advance`](Self::advance): retreating from the
    /// first entry yields [`Location::BeforeFirst`], retreating from
    /// `AfterLast` yields the last entry, and `BeforeFirst` stays put.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Stale`] if the location's entry was deleted.
    pub fn retreat(&self, location: Location) -> Result<Location, LocationError> {
        match location {
            Location::BeforeFirst => Ok(Location::BeforeFirst),
            Location::AfterLast => Ok(self.end_location()),
            Location::Entry(handle) => {
                self.ensure_live(handle)?;
                Ok(self.predecessor(handle))
            }
        }
    }

    /// Returns the key and value at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Sentinel`] for either sentinel and
    /// [`LocationError::Stale`] if the entry was deleted.
    pub fn dereference(&self, location: Location) -> Result<(&K, &V), LocationError> {
        match location {
            Location::BeforeFirst => Err(LocationError::Sentinel(Sentinel::BeforeFirst)),
            Location::AfterLast => Err(LocationError::Sentinel(Sentinel::AfterLast)),
            Location::Entry(handle) => self
                .get_handle(handle)
                .ok_or(LocationError::Stale(handle)),
        }
    }

    /// Returns a mutable reference to the value at `location`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`dereference`](Self::dereference).
    pub fn value_mut(&mut self, location: Location) -> Result<&mut V, LocationError> {
        match location {
            Location::BeforeFirst => Err(LocationError::Sentinel(Sentinel::BeforeFirst)),
            Location::AfterLast => Err(LocationError::Sentinel(Sentinel::AfterLast)),
            Location::Entry(handle) => self
                .entries
                .get_mut(handle)
                .map(|entry| &mut entry.value)
                .ok_or(LocationError::Stale(handle)),
        }
    }

    /// Returns `true` if `location` names a live entry.
    #[must_use]
    pub fn is_live(&self, location: Location) -> bool {
        location
            .handle()
            .is_some_and(|handle| self.entries.contains(handle))
    }

    /// Returns the entry with the smallest key.
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.dereference(self.begin_location()).ok()
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        self.dereference(self.end_location()).ok()
    }
}
