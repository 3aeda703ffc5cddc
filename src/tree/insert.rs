//! Insertion and split propagation.
//!
//! A new handle always lands in a leaf. A leaf that reaches three entries
//! splits into a two-entry lower half and a one-entry upper half, and a copy
//! of the lower half's largest key becomes the separator between them in the
//! parent. A parent that reaches four children splits into two nodes of two
//! children each, pushing its middle separator one level up. A split of the
//! root creates a new root, which is the only way the tree grows taller.

use tracing::trace;

use super::node::{
    BRANCH_CAPACITY, Children, LEAF_CAPACITY, LeafEntries, MIN_CHILDREN, Node, Separators,
};
use super::{NodeId, TwoThreeTree};
use crate::arena::Handle;
use crate::ordering::KeyOrder;

impl<K: Clone, V, O: KeyOrder<K>> TwoThreeTree<K, V, O> {
    /// Inserts a key-value pair.
    ///
    /// If an entry with an equivalent key exists, its value is overwritten
    /// in place and its existing handle is returned with `false`. Otherwise a
    /// new entry is created and its handle is returned with `true`. The
    /// stored key is never replaced.
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
    /// let (first, inserted) = tree.insert(1, "one");
    /// assert!(inserted);
    ///
    /// let (second, inserted) = tree.insert(1, "ONE");
    /// assert!(!inserted);
    /// assert_eq!(first, second);
    /// assert_eq!(tree.get(&1), Some(&"ONE"));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (Handle, bool) {
        let leaf = self.leaf_for(&key);
        match self.position_in_leaf(leaf, &key) {
            Ok(slot) => {
                let handle = self.nodes.get(leaf).entries()[slot];
                // The handle came out of a leaf, so it is live.
                let _ = self.entries.set_value(handle, value);
                (handle, false)
            }
            Err(slot) => {
                let handle = self.entries.allocate(key, value, leaf);
                if let Some(entries) = self.nodes.get_mut(leaf).entries_mut() {
                    entries.insert(slot, handle);
                }
                if self.nodes.get(leaf).entries().len() > LEAF_CAPACITY {
                    self.split_leaf(leaf);
                }
                (handle, true)
            }
        }
    }

    /// Inserts a key-value pair and returns the value it replaced, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twothree::TwoThreeTree;
    ///
    /// let mut tree = TwoThreeTree::new();
    /// assert_eq!(tree.replace(7, 'a'), None);
    /// assert_eq!(tree.replace(7, 'b'), Some('a'));
    /// ```
    pub fn replace(&mut self, key: K, value: V) -> Option<V> {
        if let Some(handle) = self.find(&key).handle() {
            return self.entries.set_value(handle, value).ok();
        }
        self.insert(key, value);
        None
    }

    fn split_leaf(&mut self, leaf: NodeId) {
        let parent = self.nodes.get(leaf).parent;
        let Some(entries) = self.nodes.get_mut(leaf).entries_mut() else {
            return;
        };
        let upper: LeafEntries = entries.drain(LEAF_CAPACITY..).collect();
        let Some(&lower_max) = entries.last() else {
            return;
        };
        let separator = self.entries.resident(lower_max).key.clone();

        let sibling = self.nodes.allocate(Node::leaf(parent, upper.clone()));
        for handle in upper {
            self.entries.relocate(handle, sibling);
        }
        self.attach_sibling(leaf, separator, sibling);
    }

    fn split_internal(&mut self, node: NodeId) {
        let parent = self.nodes.get(node).parent;
        let Some((children, separators)) = self.nodes.get_mut(node).branches_mut() else {
            return;
        };
        let upper_children: Children = children.drain(MIN_CHILDREN..).collect();
        let upper_separators: Separators<K> = separators.drain(MIN_CHILDREN..).collect();
        let Some(promoted) = separators.pop() else {
            return;
        };

        let sibling = self.nodes.allocate(Node::internal(
            parent,
            upper_children.clone(),
            upper_separators,
        ));
        for child in upper_children {
            self.nodes.get_mut(child).parent = Some(sibling);
        }
        self.attach_sibling(node, promoted, sibling);
    }

    /// Links `right` into the tree directly after `left`, with `separator`
    /// between them, splitting upward as needed.
    fn attach_sibling(&mut self, left: NodeId, separator: K, right: NodeId) {
        let Some((parent, slot)) = self.nodes.slot_in_parent(left) else {
            self.grow_root(left, separator, right);
            return;
        };
        if let Some((children, separators)) = self.nodes.get_mut(parent).branches_mut() {
            children.insert(slot + 1, right);
            separators.insert(slot, separator);
        }
        self.nodes.get_mut(right).parent = Some(parent);
        if self.nodes.get(parent).children().len() > BRANCH_CAPACITY {
            self.split_internal(parent);
        }
    }

    fn grow_root(&mut self, left: NodeId, separator: K, right: NodeId) {
        let children: Children = [left, right].into_iter().collect();
        let separators: Separators<K> = std::iter::once(separator).collect();
        let root = self.nodes.allocate(Node::internal(None, children, separators));
        self.nodes.get_mut(left).parent = Some(root);
        self.nodes.get_mut(right).parent = Some(root);
        self.root = root;
        self.height += 1;
        trace!(height = self.height, entries = self.len(), "root split");
    }
}
