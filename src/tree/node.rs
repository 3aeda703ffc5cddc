//! Tree nodes and the arena that owns them.
//!
//! Nodes reference each other by [`NodeId`] (an index into [`NodeArena`])
//! rather than by pointer, so parent back-links cost nothing in ownership
//! terms. Every capacity below leaves room for exactly one element of
//! overflow: a node is allowed to hold one item too many between an insert
//! and the split that immediately follows it.

use arrayvec::ArrayVec;

use crate::arena::Handle;

/// Maximum entries in a leaf.
pub(crate) const LEAF_CAPACITY: usize = 2;
/// Minimum entries in a non-root leaf.
pub(crate) const MIN_ENTRIES: usize = 1;
/// Maximum children of an internal node.
pub(crate) const BRANCH_CAPACITY: usize = 3;
/// Minimum children of any internal node.
pub(crate) const MIN_CHILDREN: usize = 2;

pub(crate) const ENTRY_SLOTS: usize = LEAF_CAPACITY + 1;
pub(crate) const CHILD_SLOTS: usize = BRANCH_CAPACITY + 1;
pub(crate) const SEPARATOR_SLOTS: usize = BRANCH_CAPACITY;

pub(crate) type LeafEntries = ArrayVec<Handle, ENTRY_SLOTS>;
pub(crate) type Children = ArrayVec<NodeId, CHILD_SLOTS>;
pub(crate) type Separators<K> = ArrayVec<K, SEPARATOR_SLOTS>;

/// Index of a node inside a [`NodeArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct NodeId(usize);

impl NodeId {
    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub(crate) enum NodeKind<K> {
    /// Entry handles in ascending key order.
    Leaf { entries: LeafEntries },
    /// `separators[i]` is an upper bound (inclusive) for the keys under
    /// `children[i]` and a strict lower bound for those under `children[i + 1]`.
    Internal {
        children: Children,
        separators: Separators<K>,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind<K>,
}

impl<K> Node<K> {
    pub(crate) const fn leaf(parent: Option<NodeId>, entries: LeafEntries) -> Self {
        Self {
            parent,
            kind: NodeKind::Leaf { entries },
        }
    }

    pub(crate) const fn internal(
        parent: Option<NodeId>,
        children: Children,
        separators: Separators<K>,
    ) -> Self {
        Self {
            parent,
            kind: NodeKind::Internal {
                children,
                separators,
            },
        }
    }

    #[inline]
    pub(crate) const fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Entry handles of a leaf; empty for internal nodes.
    #[inline]
    pub(crate) fn entries(&self) -> &[Handle] {
        match &self.kind {
            NodeKind::Leaf { entries } => entries,
            NodeKind::Internal { .. } => &[],
        }
    }

    /// Children of an internal node; empty for leaves.
    #[inline]
    pub(crate) fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Leaf { .. } => &[],
            NodeKind::Internal { children, .. } => children,
        }
    }

    /// Separator keys of an internal node; empty for leaves.
    #[inline]
    pub(crate) fn separators(&self) -> &[K] {
        match &self.kind {
            NodeKind::Leaf { .. } => &[],
            NodeKind::Internal { separators, .. } => separators,
        }
    }

    #[inline]
    pub(crate) fn entries_mut(&mut self) -> Option<&mut LeafEntries> {
        match &mut self.kind {
            NodeKind::Leaf { entries } => Some(entries),
            NodeKind::Internal { .. } => None,
        }
    }

    #[inline]
    pub(crate) fn branches_mut(&mut self) -> Option<(&mut Children, &mut Separators<K>)> {
        match &mut self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Internal {
                children,
                separators,
            } => Some((children, separators)),
        }
    }
}

/// Owner of every node of one tree.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<K> {
    nodes: Vec<Node<K>>,
    free: Vec<NodeId>,
}

impl<K> NodeArena<K> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn allocate(&mut self, node: Node<K>) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.0] = node;
            id
        } else {
            let id = NodeId(self.nodes.len());
            self.nodes.push(node);
            id
        }
    }

    /// Returns a detached node's slot to the free list, dropping its separators.
    pub(crate) fn release(&mut self, id: NodeId) {
        self.nodes[id.0] = Node::leaf(None, ArrayVec::new());
        self.free.push(id);
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<K> {
        &self.nodes[id.0]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<K> {
        &mut self.nodes[id.0]
    }

    /// Number of nodes currently linked into the tree.
    pub(crate) fn live(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Parent of `child` and the position of `child` among its siblings.
    pub(crate) fn slot_in_parent(&self, child: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.get(child).parent?;
        let slot = self
            .get(parent)
            .children()
            .iter()
            .position(|&candidate| candidate == child)?;
        Some((parent, slot))
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================
