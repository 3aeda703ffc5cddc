//! Exhaustive structural validation.

use smallvec::SmallVec;

use super::node::{BRANCH_CAPACITY, LEAF_CAPACITY, MIN_CHILDREN, MIN_ENTRIES};
use super::{NodeId, TwoThreeTree};
use crate::error::InvariantViolation;
use crate::ordering::KeyOrder;

/// A node still to be visited, with the key range its ancestors allow.
struct Frame<'a, K> {
    node: NodeId,
    depth: usize,
    /// Exclusive lower bound.
    lower: Option<&'a K>,
    /// Inclusive upper bound.
    upper: Option<&'a K>,
}

impl<K, V, O: KeyOrder<K>> TwoThreeTree<K, V, O> {
    /// Verifies every structural invariant of the tree.
    ///
    /// This walks the whole tree, so it costs O(N). It is meant for tests
    /// and debugging; a tree built only through the public API always
    /// passes.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twothree::TwoThreeTree;
    ///
    /// let tree: TwoThreeTree<u32, u32> = (0..100).map(|key| (key, key)).collect();
    /// assert_eq!(tree.check_invariants(), Ok(()));
    /// ```
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.nodes.get(self.root).parent.is_some() {
            return Err(InvariantViolation::RootHasParent);
        }

        let mut stack: SmallVec<[Frame<'_, K>; 32]> = SmallVec::new();
        stack.push(Frame {
            node: self.root,
            depth: 0,
            lower: None,
            upper: None,
        });
        let mut reachable = 0;
        let mut counted = 0;

        while let Some(frame) = stack.pop() {
            reachable += 1;
            let node = self.nodes.get(frame.node);
            if node.is_leaf() {
                counted += node.entries().len();
                self.check_leaf(&frame)?;
                continue;
            }

            let children = node.children();
            let separators = node.separators();
            if !(MIN_CHILDREN..=BRANCH_CAPACITY).contains(&children.len()) {
                return Err(InvariantViolation::InternalOccupancy {
                    node: frame.node.index(),
                    children: children.len(),
                });
            }
            if separators.len() + 1 != children.len() {
                return Err(InvariantViolation::SeparatorCount {
                    node: frame.node.index(),
                    children: children.len(),
                    separators: separators.len(),
                });
            }
            for (slot, &child) in children.iter().enumerate().rev() {
                if self.nodes.get(child).parent != Some(frame.node) {
                    return Err(InvariantViolation::ParentLink {
                        node: child.index(),
                    });
                }
                stack.push(Frame {
                    node: child,
                    depth: frame.depth + 1,
                    lower: slot
                        .checked_sub(1)
                        .map_or(frame.lower, |previous| separators.get(previous)),
                    upper: separators.get(slot).or(frame.upper),
                });
            }
        }

        if counted != self.entries.len() {
            return Err(InvariantViolation::CountMismatch {
                counted,
                recorded: self.entries.len(),
            });
        }
        if reachable != self.nodes.live() {
            return Err(InvariantViolation::LeakedNodes {
                reachable,
                allocated: self.nodes.live(),
            });
        }
        self.check_order()
    }

    fn check_leaf(&self, frame: &Frame<'_, K>) -> Result<(), InvariantViolation> {
        if frame.depth != self.height {
            return Err(InvariantViolation::UnevenLeafDepth {
                depth: frame.depth,
                height: self.height,
            });
        }
        let entries = self.nodes.get(frame.node).entries();
        let minimum = if frame.node == self.root { 0 } else { MIN_ENTRIES };
        if !(minimum..=LEAF_CAPACITY).contains(&entries.len()) {
            return Err(InvariantViolation::LeafOccupancy {
                node: frame.node.index(),
                entries: entries.len(),
            });
        }

        for &handle in entries {
            let Some(entry) = self.entries.get(handle) else {
                return Err(InvariantViolation::DanglingHandle(handle));
            };
            if entry.leaf != frame.node {
                return Err(InvariantViolation::EntryBackLink(handle));
            }
            let above_lower = frame
                .lower
                .is_none_or(|lower| self.order.less(lower, &entry.key));
            let within_upper = frame
                .upper
                .is_none_or(|upper| !self.order.less(upper, &entry.key));
            if !(above_lower && within_upper) {
                return Err(InvariantViolation::KeyOutOfRange(handle));
            }
        }
        Ok(())
    }

    /// In-order traversal must yield strictly increasing keys.
    fn check_order(&self) -> Result<(), InvariantViolation> {
        let mut previous: Option<&K> = None;
        for handle in self.handles_in_order() {
            let key = &self.entries.resident(handle).key;
            if previous.is_some_and(|previous| !self.order.less(previous, key)) {
                return Err(InvariantViolation::OutOfOrder(handle));
            }
            previous = Some(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::InvariantViolation;
    use crate::TwoThreeTree;
    use rstest::rstest;

    #[rstest]
    fn test_valid_tree_passes() {
        let mut tree: TwoThreeTree<i32, ()> = (0..500).map(|key| (key * 7 % 500, ())).collect();
        assert_eq!(tree.check_invariants(), Ok(()));
        for key in (0..500).step_by(3) {
            tree.remove(&key);
        }
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[rstest]
    fn test_wrong_height_is_reported() {
        let mut tree: TwoThreeTree<i32, ()> = (0..10).map(|key| (key, ())).collect();
        tree.height += 1;
        assert!(matches!(
            tree.check_invariants(),
            Err(InvariantViolation::UnevenLeafDepth { .. })
        ));
    }

    #[rstest]
    fn test_corrupted_separator_is_reported() {
        let mut tree: TwoThreeTree<i32, ()> = (0..3).map(|key| (key, ())).collect();
        let root = tree.root;
        if let Some((_, separators)) = tree.nodes.get_mut(root).branches_mut() {
            separators[0] = 100;
        }
        assert!(matches!(
            tree.check_invariants(),
            Err(InvariantViolation::KeyOutOfRange(_))
        ));
    }

    #[rstest]
    fn test_broken_parent_link_is_reported() {
        let mut tree: TwoThreeTree<i32, ()> = (0..3).map(|key| (key, ())).collect();
        let child = tree.nodes.get(tree.root).children()[1];
        tree.nodes.get_mut(child).parent = None;
        assert_eq!(
            tree.check_invariants(),
            Err(InvariantViolation::ParentLink {
                node: child.index()
            })
        );
    }
}
