use smallvec::SmallVec;

use super::node_id::NodeId;
use crate::ordering::Comparator;

// Inline capacity of the node arrays. Trees with orders up to this stay off
// the heap per node; larger orders spill transparently.
pub(crate) const INLINE_KEYS: usize = 8;
pub(crate) const INLINE_CHILDREN: usize = INLINE_KEYS + 1;

/// A single tree vertex: an ordered run of keys plus, for internal nodes,
/// one child id per key gap.
///
/// A node with no children is a leaf; everywhere else
/// `children.len() == keys.len() + 1` holds between top-level operations.
/// The parent back-reference is non-owning (it is just an arena id) and is
/// rewritten whenever the node is moved by a split, merge, rotation, or
/// root swap.
///
/// Capacity discipline lives in the tree, not here: the arrays accept one
/// key past the configured order so an overflowing insert can complete
/// before the caller splits the node.
#[derive(Clone)]
pub(crate) struct Node<K> {
    parent: Option<NodeId>,
    keys: SmallVec<[K; INLINE_KEYS]>,
    children: SmallVec<[NodeId; INLINE_CHILDREN]>,
}

/// Result of a binary search for a key within one node.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is where it would be inserted, which is also
    /// the child to descend into.
    NotFound(usize),
}

impl<K> Node<K> {
    /// Creates a new empty leaf with no parent.
    pub(crate) fn new() -> Self {
        Self {
            parent: None,
            keys: SmallVec::new(),
            children: SmallVec::new(),
        }
    }

    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    /// A node with zero child references is a leaf.
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> &K {
        &self.keys[index]
    }

    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    pub(crate) fn first_key(&self) -> Option<&K> {
        self.keys.first()
    }

    pub(crate) fn last_key(&self) -> Option<&K> {
        self.keys.last()
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> NodeId {
        self.children[index]
    }

    pub(crate) fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Index of `child` among this node's children.
    ///
    /// Panics if `child` is not ours; callers only ask about ids they just
    /// read out of a parent back-reference.
    pub(crate) fn position_of_child(&self, child: NodeId) -> usize {
        self.children
            .iter()
            .position(|&c| c == child)
            .expect("`Node::position_of_child()` - `child` has a stale parent reference!")
    }

    /// Binary search against the supplied ordering: the smallest index whose
    /// key is not less than `key`, reported as an exact hit or a miss.
    #[inline]
    pub(crate) fn search<C: Comparator<K>>(&self, key: &K, cmp: &C) -> SearchResult {
        match self.keys.binary_search_by(|probe| cmp.cmp(probe, key)) {
            Ok(index) => SearchResult::Found(index),
            Err(index) => SearchResult::NotFound(index),
        }
    }

    pub(crate) fn insert_key(&mut self, index: usize, key: K) {
        self.keys.insert(index, key);
    }

    pub(crate) fn remove_key(&mut self, index: usize) -> K {
        self.keys.remove(index)
    }

    /// Swaps the key at `index` for `key`, returning the old one.
    pub(crate) fn replace_key(&mut self, index: usize, key: K) -> K {
        core::mem::replace(&mut self.keys[index], key)
    }

    pub(crate) fn push_key_back(&mut self, key: K) {
        self.keys.push(key);
    }

    pub(crate) fn pop_key_back(&mut self) -> Option<K> {
        self.keys.pop()
    }

    pub(crate) fn push_key_front(&mut self, key: K) {
        self.keys.insert(0, key);
    }

    pub(crate) fn pop_key_front(&mut self) -> Option<K> {
        if self.keys.is_empty() {
            None
        } else {
            Some(self.keys.remove(0))
        }
    }

    pub(crate) fn insert_child(&mut self, index: usize, child: NodeId) {
        self.children.insert(index, child);
    }

    pub(crate) fn remove_child(&mut self, index: usize) -> NodeId {
        self.children.remove(index)
    }

    pub(crate) fn push_child_back(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn pop_child_back(&mut self) -> Option<NodeId> {
        self.children.pop()
    }

    pub(crate) fn push_child_front(&mut self, child: NodeId) {
        self.children.insert(0, child);
    }

    pub(crate) fn pop_child_front(&mut self) -> Option<NodeId> {
        if self.children.is_empty() {
            None
        } else {
            Some(self.children.remove(0))
        }
    }

    /// Splits this node at `mid`. Returns the promoted middle key and the
    /// new right sibling holding `keys[mid + 1..]` (and the matching
    /// children when internal); this node keeps the strict left half.
    ///
    /// The caller allocates the sibling and rewrites the parent references
    /// of any children that moved.
    pub(crate) fn split_off(&mut self, mid: usize) -> (K, Node<K>) {
        let mut right = Node::new();
        right.keys = self.keys.drain(mid + 1..).collect();
        if !self.children.is_empty() {
            right.children = self.children.drain(mid + 1..).collect();
        }
        let middle = self.keys.pop().expect("`Node::split_off()` - split point past the last key!");
        (middle, right)
    }

    /// Absorbs the separator and everything in `right`, leaving this node as
    /// the merged result. The caller rewrites parent references of the
    /// children that moved and removes `right` from the parent.
    pub(crate) fn merge_from(&mut self, separator: K, mut right: Node<K>) {
        self.keys.push(separator);
        self.keys.append(&mut right.keys);
        self.children.append(&mut right.children);
    }
}
