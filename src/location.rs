//! Positions in the ordered sequence of entries.
//!
//! A [`Location`] names either one entry (through its [`Handle`]) or one of
//! the two sentinels bracketing the sequence. Locations are plain `Copy`
//! values with no borrow on the tree; they are resolved against the tree on
//! every use, which is what keeps them safe across restructuring.
//!
//! Navigation follows a simple state machine:
//!
//! ```text
//! BeforeFirst --advance--> first .. last --advance--> AfterLast
//! BeforeFirst <--retreat-- first .. last <--retreat-- AfterLast
//! ```
//!
//! Advancing from `AfterLast` and retreating from `BeforeFirst` leave the
//! location unchanged.

use std::fmt;

use crate::arena::Handle;

/// One of the two reserved positions outside the entry sequence.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Sentinel {
    /// The position before the first entry.
    BeforeFirst,
    /// The position after the last entry.
    AfterLast,
}

impl fmt::Display for Sentinel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeFirst => formatter.write_str("before-first"),
            Self::AfterLast => formatter.write_str("after-last"),
        }
    }
}

/// A navigable position in a [`TwoThreeTree`](crate::TwoThreeTree).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Location {
    /// Before the first entry; where reverse traversal ends.
    BeforeFirst,
    /// A specific entry.
    Entry(Handle),
    /// After the last entry; where forward traversal ends.
    AfterLast,
}

impl Location {
    /// Returns the entry handle, or `None` for a sentinel.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twothree::{Location, TwoThreeTree};
    ///
    /// let mut tree = TwoThreeTree::new();
    /// let (handle, _) = tree.insert(1, "one");
    ///
    /// assert_eq!(tree.begin_location().handle(), Some(handle));
    /// assert_eq!(Location::AfterLast.handle(), None);
    /// ```
    #[inline]
    #[must_use]
    pub const fn handle(self) -> Option<Handle> {
        match self {
            Self::Entry(handle) => Some(handle),
            Self::BeforeFirst | Self::AfterLast => None,
        }
    }

    /// Returns the sentinel this location denotes, if any.
    #[inline]
    #[must_use]
    pub const fn sentinel(self) -> Option<Sentinel> {
        match self {
            Self::BeforeFirst => Some(Sentinel::BeforeFirst),
            Self::AfterLast => Some(Sentinel::AfterLast),
            Self::Entry(_) => None,
        }
    }

    /// Returns `true` for `BeforeFirst` and `AfterLast`.
    #[inline]
    #[must_use]
    pub const fn is_sentinel(self) -> bool {
        !matches!(self, Self::Entry(_))
    }
}

impl From<Handle> for Location {
    #[inline]
    fn from(handle: Handle) -> Self {
        Self::Entry(handle)
    }
}

impl From<Sentinel> for Location {
    #[inline]
    fn from(sentinel: Sentinel) -> Self {
        match sentinel {
            Sentinel::BeforeFirst => Self::BeforeFirst,
            Sentinel::AfterLast => Self::AfterLast,
        }
    }
}

static_assertions::assert_impl_all!(Location: Copy, Send, Sync, Eq, std::hash::Hash);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Sentinel::BeforeFirst, "before-first")]
    #[case(Sentinel::AfterLast, "after-last")]
    fn test_sentinel_round_trip(#[case] sentinel: Sentinel, #[case] text: &str) {
        let location = Location::from(sentinel);
        assert!(location.is_sentinel());
        assert_eq!(location.sentinel(), Some(sentinel));
        assert_eq!(location.handle(), None);
        assert_eq!(sentinel.to_string(), text);
    }
}
