//! Error types for tree navigation and structural checks.
//!
//! A missing key is never an error: lookups report it through `Option` or
//! [`Search::Missing`](crate::Search::Missing). Errors here cover misuse of
//! locations and, for tests, broken structural invariants.

use crate::arena::Handle;
use crate::location::Sentinel;

/// Represents an attempt to use a location that does not name a live entry.
///
/// # Examples
///
/// ```rust
/// use twothree::{Location, LocationError, Sentinel, TwoThreeTree};
///
/// let tree: TwoThreeTree<i32, &str> = TwoThreeTree::default();
/// let error = tree.dereference(Location::AfterLast).unwrap_err();
///
/// assert_eq!(error, LocationError::Sentinel(Sentinel::AfterLast));
/// assert_eq!(format!("{error}"), "cannot dereference the after-last sentinel");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    /// The location is a sentinel and names no entry.
    Sentinel(Sentinel),
    /// The entry the handle referred to has been deleted.
    Stale(Handle),
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sentinel(sentinel) => {
                write!(formatter, "cannot dereference the {sentinel} sentinel")
            }
            Self::Stale(handle) => {
                write!(formatter, "handle {handle} no longer names a live entry")
            }
        }
    }
}

impl std::error::Error for LocationError {}

/// Represents a broken structural invariant found by
/// [`TwoThreeTree::check_invariants`](crate::TwoThreeTree::check_invariants).
///
/// A correct tree never produces one of these; they exist so tests can
/// pinpoint what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root node has a parent link.
    RootHasParent,
    /// A leaf sits at a depth different from the tree height.
    UnevenLeafDepth {
        /// Depth of the offending leaf.
        depth: usize,
        /// Recorded tree height.
        height: usize,
    },
    /// A leaf holds too few or too many entries.
    LeafOccupancy {
        /// Arena index of the leaf.
        node: usize,
        /// Number of entries found.
        entries: usize,
    },
    /// An internal node holds too few or too many children.
    InternalOccupancy {
        /// Arena index of the node.
        node: usize,
        /// Number of children found.
        children: usize,
    },
    /// An internal node's separator count is not one less than its child count.
    SeparatorCount {
        /// Arena index of the node.
        node: usize,
        /// Number of children found.
        children: usize,
        /// Number of separators found.
        separators: usize,
    },
    /// A child's parent link does not point at the node holding it.
    ParentLink {
        /// Arena index of the child.
        node: usize,
    },
    /// A leaf references a handle that is not live.
    DanglingHandle(Handle),
    /// A live entry records a different leaf than the one holding it.
    EntryBackLink(Handle),
    /// An entry's key falls outside the range its ancestors' separators allow.
    KeyOutOfRange(Handle),
    /// An entry's key does not sort strictly after its predecessor's.
    OutOfOrder(Handle),
    /// The number of reachable entries differs from the recorded count.
    CountMismatch {
        /// Entries reached by traversal.
        counted: usize,
        /// Entries recorded by the arena.
        recorded: usize,
    },
    /// The node arena holds nodes that are not reachable from the root.
    LeakedNodes {
        /// Nodes reached by traversal.
        reachable: usize,
        /// Nodes the arena considers live.
        allocated: usize,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RootHasParent => formatter.write_str("root node has a parent link"),
            Self::UnevenLeafDepth { depth, height } => {
                write!(formatter, "leaf at depth {depth} in a tree of height {height}")
            }
            Self::LeafOccupancy { node, entries } => {
                write!(formatter, "leaf {node} holds {entries} entries")
            }
            Self::InternalOccupancy { node, children } => {
                write!(formatter, "internal node {node} holds {children} children")
            }
            Self::SeparatorCount {
                node,
                children,
                separators,
            } => write!(
                formatter,
                "internal node {node} has {separators} separators for {children} children"
            ),
            Self::ParentLink { node } => {
                write!(formatter, "node {node} does not link back to its parent")
            }
            Self::DanglingHandle(handle) => {
                write!(formatter, "leaf references retired handle {handle}")
            }
            Self::EntryBackLink(handle) => {
                write!(formatter, "entry {handle} records the wrong leaf")
            }
            Self::KeyOutOfRange(handle) => {
                write!(formatter, "entry {handle} lies outside its separator range")
            }
            Self::OutOfOrder(handle) => {
                write!(formatter, "entry {handle} does not follow its predecessor")
            }
            Self::CountMismatch { counted, recorded } => write!(
                formatter,
                "traversal reached {counted} entries but {recorded} are recorded"
            ),
            Self::LeakedNodes {
                reachable,
                allocated,
            } => write!(
                formatter,
                "{reachable} nodes reachable but {allocated} allocated"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_location_error_display_sentinel() {
        let error = LocationError::Sentinel(Sentinel::BeforeFirst);
        assert_eq!(
            format!("{error}"),
            "cannot dereference the before-first sentinel"
        );
    }

    #[rstest]
    fn test_invariant_violation_display() {
        let error = InvariantViolation::UnevenLeafDepth {
            depth: 1,
            height: 2,
        };
        assert_eq!(format!("{error}"), "leaf at depth 1 in a tree of height 2");

        let error = InvariantViolation::CountMismatch {
            counted: 3,
            recorded: 4,
        };
        assert_eq!(
            format!("{error}"),
            "traversal reached 3 entries but 4 are recorded"
        );
    }

    #[rstest]
    fn test_errors_are_std_errors() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&LocationError::Sentinel(Sentinel::AfterLast));
        assert_error(&InvariantViolation::RootHasParent);
    }
}
