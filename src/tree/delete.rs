//! Deletion and underflow repair.
//!
//! Deleting is handle driven: the entry records its leaf, so no key search
//! is needed. A non-root leaf left empty first tries to borrow a boundary
//! entry from an adjacent sibling that has two; otherwise it is dropped
//! together with one separator of its parent. A parent left with a single
//! child repairs itself the same way one level up, borrowing a child (and
//! rotating a separator through the grandparent) or merging into a sibling.
//! When the root is left with a single child, that child becomes the root
//! and the tree shrinks by one level.

use std::mem;

use tracing::trace;

use super::node::{MIN_CHILDREN, MIN_ENTRIES};
use super::{NodeId, TwoThreeTree};
use crate::arena::Handle;
use crate::ordering::KeyOrder;

impl<K: Clone, V, O> TwoThreeTree<K, V, O> {
    /// Deletes the entry behind `handle` and returns its key and value.
    ///
    /// Returns `None`, leaving the tree untouched, if the handle is stale.
    /// Every other handle stays valid.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twothree::TwoThreeTree;
    ///
    /// let mut tree = TwoThreeTree::new();
    /// let (one, _) = tree.insert(1, "one");
    /// let (two, _) = tree.insert(2, "two");
    ///
    /// assert_eq!(tree.delete(one), Some((1, "one")));
    /// assert_eq!(tree.delete(one), None);
    /// assert_eq!(tree.get_handle(two), Some((&2, &"two")));
    /// ```
    pub fn delete(&mut self, handle: Handle) -> Option<(K, V)> {
        let leaf = self.entries.get(handle)?.leaf;
        if let Some(entries) = self.nodes.get_mut(leaf).entries_mut() {
            if let Some(slot) = entries.iter().position(|&candidate| candidate == handle) {
                entries.remove(slot);
            }
        }
        let entry = self.entries.retire(handle)?;
        if leaf != self.root && self.nodes.get(leaf).entries().is_empty() {
            self.repair_leaf(leaf);
        }
        Some((entry.key, entry.value))
    }

    /// Removes and returns the first entry.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let handle = self.begin_location().handle()?;
        self.delete(handle)
    }

    /// Removes and returns the last entry.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let handle = self.end_location().handle()?;
        self.delete(handle)
    }

    /// Keeps only the entries for which `predicate` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twothree::TwoThreeTree;
    ///
    /// let mut tree: TwoThreeTree<i32, i32> = (0..10).map(|key| (key, key)).collect();
    /// tree.retain(|key, _| key % 3 == 0);
    ///
    /// let keys: Vec<i32> = tree.keys().copied().collect();
    /// assert_eq!(keys, vec![0, 3, 6, 9]);
    /// ```
    pub fn retain<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let handles: Vec<Handle> = self.handles_in_order().collect();
        for handle in handles {
            let keep = self
                .entries
                .get_mut(handle)
                .is_none_or(|entry| predicate(&entry.key, &mut entry.value));
            if !keep {
                self.delete(handle);
            }
        }
    }

    // =========================================================================
    // Leaf Repair
    // =========================================================================

    /// Refills or removes an empty non-root leaf.
    fn repair_leaf(&mut self, leaf: NodeId) {
        let Some((parent, slot)) = self.nodes.slot_in_parent(leaf) else {
            return;
        };
        let left = slot
            .checked_sub(1)
            .map(|sibling| self.nodes.get(parent).children()[sibling]);
        let right = self.nodes.get(parent).children().get(slot + 1).copied();

        if let Some(left) = left {
            if self.nodes.get(left).entries().len() > MIN_ENTRIES {
                self.borrow_entry_from_left(parent, slot, left, leaf);
                return;
            }
        }
        if let Some(right) = right {
            if self.nodes.get(right).entries().len() > MIN_ENTRIES {
                self.borrow_entry_from_right(parent, slot, leaf, right);
                return;
            }
        }

        // An empty leaf merged into its sibling leaves the sibling unchanged.
        self.detach_child(parent, slot);
        self.nodes.release(leaf);
        self.repair_internal(parent);
    }

    fn borrow_entry_from_left(&mut self, parent: NodeId, slot: usize, left: NodeId, leaf: NodeId) {
        let Some(moved) = self
            .nodes
            .get_mut(left)
            .entries_mut()
            .and_then(|entries| entries.pop())
        else {
            return;
        };
        if let Some(entries) = self.nodes.get_mut(leaf).entries_mut() {
            entries.insert(0, moved);
        }
        self.entries.relocate(moved, leaf);

        if let Some(&left_max) = self.nodes.get(left).entries().last() {
            let separator = self.entries.resident(left_max).key.clone();
            self.replace_separator(parent, slot - 1, separator);
        }
    }

    fn borrow_entry_from_right(
        &mut self,
        parent: NodeId,
        slot: usize,
        leaf: NodeId,
        right: NodeId,
    ) {
        let Some(moved) = self
            .nodes
            .get_mut(right)
            .entries_mut()
            .and_then(|entries| entries.pop_at(0))
        else {
            return;
        };
        if let Some(entries) = self.nodes.get_mut(leaf).entries_mut() {
            entries.push(moved);
        }
        self.entries.relocate(moved, leaf);

        let separator = self.entries.resident(moved).key.clone();
        self.replace_separator(parent, slot, separator);
    }

    // =========================================================================
    // Internal Repair
    // =========================================================================

    /// Restores the child-count invariant of `node` after it lost a child.
    fn repair_internal(&mut self, node: NodeId) {
        if self.nodes.get(node).children().len() >= MIN_CHILDREN {
            return;
        }
        if node == self.root {
            self.collapse_root();
            return;
        }
        let Some((parent, slot)) = self.nodes.slot_in_parent(node) else {
            return;
        };
        let left = slot
            .checked_sub(1)
            .map(|sibling| self.nodes.get(parent).children()[sibling]);
        let right = self.nodes.get(parent).children().get(slot + 1).copied();

        if let Some(left) = left {
            if self.nodes.get(left).children().len() > MIN_CHILDREN {
                self.borrow_child_from_left(parent, slot, left, node);
                return;
            }
        }
        if let Some(right) = right {
            if self.nodes.get(right).children().len() > MIN_CHILDREN {
                self.borrow_child_from_right(parent, slot, node, right);
                return;
            }
        }

        match (left, right) {
            (Some(left), _) => self.merge_into_left(parent, slot, left, node),
            (None, Some(right)) => self.merge_into_right(parent, slot, node, right),
            (None, None) => return,
        }
        self.nodes.release(node);
        self.repair_internal(parent);
    }

    fn collapse_root(&mut self) {
        let Some(&child) = self.nodes.get(self.root).children().first() else {
            return;
        };
        self.nodes.get_mut(child).parent = None;
        self.nodes.release(self.root);
        self.root = child;
        self.height -= 1;
        trace!(height = self.height, entries = self.len(), "root collapsed");
    }

    /// Moves the last child of `left` to the front of `node`, rotating the
    /// separator between them through `parent`.
    fn borrow_child_from_left(&mut self, parent: NodeId, slot: usize, left: NodeId, node: NodeId) {
        let Some((children, separators)) = self.nodes.get_mut(left).branches_mut() else {
            return;
        };
        let (Some(moved), Some(raised)) = (children.pop(), separators.pop()) else {
            return;
        };
        let Some(lowered) = self.swap_separator(parent, slot - 1, raised) else {
            return;
        };
        if let Some((children, separators)) = self.nodes.get_mut(node).branches_mut() {
            children.insert(0, moved);
            separators.insert(0, lowered);
        }
        self.nodes.get_mut(moved).parent = Some(node);
    }

    /// Moves the first child of `right` to the back of `node`, rotating the
    /// separator between them through `parent`.
    fn borrow_child_from_right(
        &mut self,
        parent: NodeId,
        slot: usize,
        node: NodeId,
        right: NodeId,
    ) {
        let Some((children, separators)) = self.nodes.get_mut(right).branches_mut() else {
            return;
        };
        let (Some(moved), Some(raised)) = (children.pop_at(0), separators.pop_at(0)) else {
            return;
        };
        let Some(lowered) = self.swap_separator(parent, slot, raised) else {
            return;
        };
        if let Some((children, separators)) = self.nodes.get_mut(node).branches_mut() {
            children.push(moved);
            separators.push(lowered);
        }
        self.nodes.get_mut(moved).parent = Some(node);
    }

    /// Appends the children of `node` to `left`, pulling down the separator
    /// that divided them.
    fn merge_into_left(&mut self, parent: NodeId, slot: usize, left: NodeId, node: NodeId) {
        let Some(lowered) = self.detach_child(parent, slot) else {
            return;
        };
        let Some((orphans, orphan_separators)) = self.nodes.get_mut(node).branches_mut() else {
            return;
        };
        let orphans = mem::take(orphans);
        let orphan_separators = mem::take(orphan_separators);
        if let Some((children, separators)) = self.nodes.get_mut(left).branches_mut() {
            separators.push(lowered);
            separators.extend(orphan_separators);
            children.extend(orphans.iter().copied());
        }
        for orphan in orphans {
            self.nodes.get_mut(orphan).parent = Some(left);
        }
    }

    /// Prepends the children of `node` to `right`, pulling down the
    /// separator that divided them.
    fn merge_into_right(&mut self, parent: NodeId, slot: usize, node: NodeId, right: NodeId) {
        let Some(lowered) = self.detach_child(parent, slot) else {
            return;
        };
        let Some((orphans, orphan_separators)) = self.nodes.get_mut(node).branches_mut() else {
            return;
        };
        let orphans = mem::take(orphans);
        let mut prefix = mem::take(orphan_separators);
        prefix.push(lowered);
        if let Some((children, separators)) = self.nodes.get_mut(right).branches_mut() {
            for (offset, orphan) in orphans.iter().copied().enumerate() {
                children.insert(offset, orphan);
            }
            for (offset, separator) in prefix.into_iter().enumerate() {
                separators.insert(offset, separator);
            }
        }
        for orphan in orphans {
            self.nodes.get_mut(orphan).parent = Some(right);
        }
    }

    // =========================================================================
    // Separator Bookkeeping
    // =========================================================================

    /// Unlinks `parent.children[slot]` along with one adjacent separator,
    /// preferring the one to its left, and returns that separator.
    fn detach_child(&mut self, parent: NodeId, slot: usize) -> Option<K> {
        let (children, separators) = self.nodes.get_mut(parent).branches_mut()?;
        children.pop_at(slot)?;
        separators.pop_at(slot.saturating_sub(1))
    }

    fn replace_separator(&mut self, node: NodeId, index: usize, separator: K) {
        self.swap_separator(node, index, separator);
    }

    fn swap_separator(&mut self, node: NodeId, index: usize, separator: K) -> Option<K> {
        let (_, separators) = self.nodes.get_mut(node).branches_mut()?;
        separators
            .get_mut(index)
            .map(|slot| mem::replace(slot, separator))
    }
}

impl<K: Clone, V, O: KeyOrder<K>> TwoThreeTree<K, V, O> {
    /// Removes the entry stored under `key` and returns its value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twothree::TwoThreeTree;
    ///
    /// let mut tree = TwoThreeTree::new();
    /// tree.insert(1, "one");
    ///
    /// assert_eq!(tree.remove(&1), Some("one"));
    /// assert_eq!(tree.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes the entry stored under `key` and returns the stored key and
    /// value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let handle = self.find(key).handle()?;
        self.delete(handle)
    }
}
