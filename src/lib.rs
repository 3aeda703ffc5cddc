//! # twothree
//!
//! An in-memory ordered map built on a 2-3 tree, with stable entry handles
//! and bidirectional in-order navigation.
//!
//! ## Overview
//!
//! - **Ordered map**: [`TwoThreeTree`] keeps unique keys sorted under a
//!   pluggable [`KeyOrder`](ordering::KeyOrder) policy and guarantees
//!   O(log N) find, insert and delete.
//! - **Stable handles**: every entry is named by a [`Handle`] that survives
//!   any restructuring of the tree and is reliably detected as stale once
//!   its entry is deleted.
//! - **Locations**: a [`Location`] is a handle or one of two sentinels,
//!   [`Location::BeforeFirst`] and [`Location::AfterLast`]. Locations can be
//!   advanced, retreated and dereferenced.
//! - **Self-checking**: [`TwoThreeTree::check_invariants`] validates the
//!   whole structure.
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`TwoThreeTree`] as a map
//! - `sync`: [`SharedTree`], a reader-writer locked tree shared across threads
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use twothree::prelude::*;
//!
//! let mut tree = TwoThreeTree::new();
//! let (handle, _) = tree.insert("b", 2);
//! tree.insert("a", 1);
//! tree.insert("c", 3);
//!
//! let before = tree.retreat(Location::Entry(handle)).unwrap();
//! assert_eq!(tree.dereference(before), Ok((&"a", &1)));
//!
//! tree.delete(handle);
//! assert_eq!(
//!     tree.dereference(Location::Entry(handle)),
//!     Err(LocationError::Stale(handle))
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use twothree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{InvariantViolation, LocationError};
    pub use crate::ordering::{Ascending, Comparator, Descending, KeyOrder, LessThan};
    pub use crate::{Handle, Location, Search, Sentinel, TwoThreeTree};

    #[cfg(feature = "sync")]
    pub use crate::SharedTree;
}

mod arena;
pub mod error;
mod iter;
mod location;
pub mod ordering;
mod tree;

#[cfg(feature = "sync")]
mod shared;

pub use arena::Handle;
pub use error::{InvariantViolation, LocationError};
pub use iter::{IntoIter, Iter, Range};
pub use location::{Location, Sentinel};
pub use tree::{Search, TwoThreeTree};

#[cfg(feature = "sync")]
pub use shared::SharedTree;
