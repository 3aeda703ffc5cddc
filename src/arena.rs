//! Dense slot storage for tree entries.
//!
//! Entries live in a single `Vec` of slots and are addressed by [`Handle`].
//! Retired slots go onto a free list and are reissued by later allocations,
//! so every slot carries a generation counter that is bumped on retirement.
//! A handle only resolves while its generation matches the slot's, which
//! means a handle that outlived its entry reports "stale" instead of
//! silently naming whatever entry reused the slot.

use std::fmt;

use crate::tree::NodeId;

// =============================================================================
// Handle
// =============================================================================

/// Stable reference to one entry of a [`TwoThreeTree`](crate::TwoThreeTree).
///
/// A handle stays valid across any number of inserts and deletes of *other*
/// entries, including the splits and merges those trigger. Once its own entry
/// is deleted the handle is stale forever: the slot may be reused, but under
/// a different generation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    index: usize,
    generation: u32,
}

impl Handle {
    /// Slot index inside the entry arena.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Generation of the slot when this handle was issued.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Handle({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}v{}", self.index, self.generation)
    }
}

static_assertions::assert_impl_all!(Handle: Copy, Send, Sync, std::hash::Hash, Ord);

// =============================================================================
// Entry Arena
// =============================================================================

/// A live key-value pair plus the leaf that currently holds its handle.
#[derive(Clone, Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) leaf: NodeId,
}

#[derive(Clone, Debug)]
struct Slot<K, V> {
    generation: u32,
    entry: Option<Entry<K, V>>,
}

/// Slot storage with free-list reuse.
#[derive(Clone, Debug)]
pub(crate) struct EntryArena<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Vec<usize>,
    live: usize,
}

impl<K, V> EntryArena<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live entries.
    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.live
    }

    /// Stores a new entry, reusing the most recently retired slot if any.
    pub(crate) fn allocate(&mut self, key: K, value: V, leaf: NodeId) -> Handle {
        let entry = Some(Entry { key, value, leaf });
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.entry = entry;
            Handle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len();
            self.slots.push(Slot {
                generation: 0,
                entry,
            });
            Handle {
                index,
                generation: 0,
            }
        }
    }

    /// Removes the entry behind `handle` and puts its slot on the free list.
    ///
    /// Returns `None` if the handle is stale.
    pub(crate) fn retire(&mut self, handle: Handle) -> Option<Entry<K, V>> {
        let slot = self.slots.get_mut(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Some(entry)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> Option<&Entry<K, V>> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> Option<&mut Entry<K, V>> {
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    #[inline]
    pub(crate) fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Entry behind a handle that the tree structure itself holds.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, which means a node still references a
    /// retired slot.
    #[inline]
    pub(crate) fn resident(&self, handle: Handle) -> &Entry<K, V> {
        match self.get(handle) {
            Some(entry) => entry,
            None => unreachable!("tree references retired entry {handle}"),
        }
    }

    /// Replaces the value of a live entry, handing back the old one.
    ///
    /// A stale handle gets the new value back as `Err`.
    pub(crate) fn set_value(&mut self, handle: Handle, value: V) -> Result<V, V> {
        match self.get_mut(handle) {
            Some(entry) => Ok(std::mem::replace(&mut entry.value, value)),
            None => Err(value),
        }
    }

    /// Records that `handle` now lives in `leaf`.
    #[inline]
    pub(crate) fn relocate(&mut self, handle: Handle, leaf: NodeId) {
        if let Some(entry) = self.get_mut(handle) {
            entry.leaf = leaf;
        }
    }

    /// Retires every live entry.
    ///
    /// Generations keep counting so handles issued before the clear stay
    /// stale after it.
    pub(crate) fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index);
        }
        self.free.reverse();
        self.live = 0;
    }
}

// =============================================================================
// Tests
// =============================================================================
