use log::trace;

use super::arena::Arena;
use super::node::{Node, SearchResult};
use super::node_id::NodeId;
use crate::error::TreeError;
use crate::ordering::Comparator;

/// The core B-tree implementation backing `MwayTreeSet`.
///
/// Keys live in every node, internal nodes carry one child id per key gap,
/// and each node keeps a back-reference to its parent. The root always
/// exists; an empty tree is a root leaf with zero keys.
///
/// A node holds at most `order` keys. One past that is the transient
/// overflow state an insert leaves behind for its caller to split; dropping
/// below `min_keys` (for a non-root node) is the underflow state the
/// erase path repairs with a rotation or a merge.
#[derive(Clone)]
pub(crate) struct RawTree<K, C> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Id of the root node. Never dangles; rewritten on root growth/collapse.
    root: NodeId,
    /// Total number of keys in the tree.
    len: usize,
    /// Maximum keys per node.
    order: usize,
    /// Minimum keys per non-root node, `ceil((order + 1) / 2) - 1`.
    min_keys: usize,
    /// The strict total order keys are arranged by.
    cmp: C,
}

impl<K, C> RawTree<K, C> {
    /// Creates an empty tree, rejecting orders that cannot satisfy the
    /// split invariants.
    pub(crate) fn new(order: usize, cmp: C) -> Result<Self, TreeError> {
        if order < 3 {
            return Err(TreeError::InvalidOrder(order));
        }

        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::new());
        Ok(Self {
            nodes,
            root,
            len: 0,
            order,
            min_keys: (order + 1).div_ceil(2) - 1,
            cmp,
        })
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) const fn order(&self) -> usize {
        self.order
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K> {
        self.nodes.get(id)
    }

    /// Levels from the root down to the leaves; 1 for a lone root leaf.
    /// All leaves sit at the same depth, so the leftmost spine suffices.
    pub(crate) fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while !self.nodes.get(current).is_leaf() {
            current = self.nodes.get(current).child(0);
            height += 1;
        }
        height
    }

    /// Drops every key and resets to a single empty root.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(Node::new());
        self.len = 0;
    }

    /// The smallest key under the configured order, if any.
    pub(crate) fn first(&self) -> Option<&K> {
        let mut current = self.root;
        while !self.nodes.get(current).is_leaf() {
            current = self.nodes.get(current).child(0);
        }
        self.nodes.get(current).first_key()
    }

    /// The greatest key under the configured order, if any.
    pub(crate) fn last(&self) -> Option<&K> {
        let mut current = self.root;
        while !self.nodes.get(current).is_leaf() {
            let node = self.nodes.get(current);
            current = node.child(node.child_count() - 1);
        }
        self.nodes.get(current).last_key()
    }

    /// In-order traversal: every key exactly once, ascending under the
    /// configured order. Restarts from the root on each call.
    pub(crate) fn traverse<F: FnMut(&K)>(&self, visitor: &mut F) {
        self.traverse_node(self.root, visitor);
    }

    fn traverse_node<F: FnMut(&K)>(&self, id: NodeId, visitor: &mut F) {
        let node = self.nodes.get(id);
        if node.is_leaf() {
            for key in node.keys() {
                visitor(key);
            }
            return;
        }

        for index in 0..node.key_count() {
            self.traverse_node(node.child(index), visitor);
            visitor(node.key(index));
        }
        self.traverse_node(node.child(node.key_count()), visitor);
    }

    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl<K, C: Comparator<K>> RawTree<K, C> {
    /// Iterative descent to the node and index holding `key`, or `None` on
    /// a leaf miss.
    pub(crate) fn locate(&self, key: &K) -> Option<(NodeId, usize)> {
        let mut current = self.root;

        loop {
            let node = self.nodes.get(current);
            match node.search(key, &self.cmp) {
                SearchResult::Found(index) => return Some((current, index)),
                SearchResult::NotFound(index) => {
                    if node.is_leaf() {
                        return None;
                    }
                    current = node.child(index);
                }
            }
        }
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    /// Returns a reference to the stored key equal to `key` under the
    /// configured order.
    pub(crate) fn get(&self, key: &K) -> Option<&K> {
        let (id, index) = self.locate(key)?;
        Some(self.nodes.get(id).key(index))
    }

    /// Inserts a key. Returns false (and keeps the stored key) if an equal
    /// key is already present.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        let inserted = self.insert_at(self.root, key);
        if inserted {
            self.len += 1;
            if self.nodes.get(self.root).key_count() > self.order {
                self.grow_root();
            }
        }
        inserted
    }

    /// Recursive insert. On the way back up, a child left in the overflow
    /// state is split from here, its parent; the tree handles the root the
    /// same way once the recursion unwinds completely.
    fn insert_at(&mut self, id: NodeId, key: K) -> bool {
        let pos = match self.nodes.get(id).search(&key, &self.cmp) {
            SearchResult::Found(_) => return false,
            SearchResult::NotFound(pos) => pos,
        };

        if self.nodes.get(id).is_leaf() {
            self.nodes.get_mut(id).insert_key(pos, key);
            return true;
        }

        let child = self.nodes.get(id).child(pos);
        let inserted = self.insert_at(child, key);
        if inserted && self.nodes.get(child).key_count() > self.order {
            self.split_child(id, pos);
        }
        inserted
    }

    /// Splits the overflowing child at `pos` around its middle key, which
    /// moves up into this node as the separator between the two halves.
    fn split_child(&mut self, parent: NodeId, pos: usize) {
        let mid = self.order / 2;
        let child = self.nodes.get(parent).child(pos);

        let (middle, mut right) = self.nodes.get_mut(child).split_off(mid);
        right.set_parent(Some(parent));
        let right_id = self.nodes.alloc(right);

        // Children that moved to the new sibling follow it.
        for index in 0..self.nodes.get(right_id).child_count() {
            let moved = self.nodes.get(right_id).child(index);
            self.nodes.get_mut(moved).set_parent(Some(right_id));
        }

        let node = self.nodes.get_mut(parent);
        node.insert_key(pos, middle);
        node.insert_child(pos + 1, right_id);

        trace!("split {child:?}: new right sibling {right_id:?}, separator promoted into {parent:?}");
    }

    /// The root overflowed: split it under a fresh root holding the single
    /// promoted key. The only place the tree grows taller.
    fn grow_root(&mut self) {
        let old_root = self.root;
        let new_root = self.nodes.alloc(Node::new());
        self.nodes.get_mut(old_root).set_parent(Some(new_root));
        self.nodes.get_mut(new_root).push_child_back(old_root);
        self.split_child(new_root, 0);
        self.root = new_root;

        trace!("root overflow: {old_root:?} split under new root {new_root:?}");
    }

    /// Removes a key. Returns false if no equal key is present.
    pub(crate) fn remove(&mut self, key: &K) -> bool {
        let Some((id, pos)) = self.locate(key) else {
            return false;
        };

        let leaf = if self.nodes.get(id).is_leaf() {
            self.nodes.get_mut(id).remove_key(pos);
            id
        } else {
            // Swap in the in-order predecessor, the rightmost key of the
            // left subtree, and continue the fix-up from the leaf it left.
            let mut current = self.nodes.get(id).child(pos);
            while !self.nodes.get(current).is_leaf() {
                let node = self.nodes.get(current);
                current = node.child(node.child_count() - 1);
            }
            let predecessor = self
                .nodes
                .get_mut(current)
                .pop_key_back()
                .expect("`RawTree::remove()` - leaves below an internal node are never empty!");
            self.nodes.get_mut(id).replace_key(pos, predecessor);
            current
        };
        self.len -= 1;

        if leaf != self.root && self.nodes.get(leaf).key_count() < self.min_keys {
            self.fix_underflow(leaf);
        }

        let root = self.nodes.get(self.root);
        if root.key_count() == 0 && !root.is_leaf() {
            self.collapse_root();
        }
        true
    }

    /// Repairs a node that dropped below `min_keys`: borrow from a sibling
    /// with surplus if either immediate neighbor has one, otherwise merge.
    /// Only the immediate left/right neighbors are ever inspected.
    fn fix_underflow(&mut self, id: NodeId) {
        let parent = self
            .nodes
            .get(id)
            .parent()
            .expect("`RawTree::fix_underflow()` - called on the root!");
        let index = self.nodes.get(parent).position_of_child(id);

        if index > 0 {
            let left = self.nodes.get(parent).child(index - 1);
            if self.nodes.get(left).key_count() > self.min_keys {
                self.rotate_cw(parent, index - 1);
                return;
            }
        }

        if index + 1 < self.nodes.get(parent).child_count() {
            let right = self.nodes.get(parent).child(index + 1);
            if self.nodes.get(right).key_count() > self.min_keys {
                self.rotate_ccw(parent, index);
                return;
            }
        }

        // No sibling can lend: merge across the nearest separator.
        let separator = if index > 0 { index - 1 } else { index };
        self.merge_children(parent, separator);
    }

    /// Moves one key clockwise across the separator at `pos`: the left
    /// child's last key displaces the separator, which becomes the right
    /// child's new first key. Internal children hand their last child
    /// reference across as well, reparented to the receiver.
    fn rotate_cw(&mut self, parent: NodeId, pos: usize) {
        let left = self.nodes.get(parent).child(pos);
        let right = self.nodes.get(parent).child(pos + 1);

        let lent = self.nodes.get_mut(left).pop_key_back().unwrap();
        let separator = self.nodes.get_mut(parent).replace_key(pos, lent);
        self.nodes.get_mut(right).push_key_front(separator);

        if let Some(moved) = self.nodes.get_mut(left).pop_child_back() {
            self.nodes.get_mut(moved).set_parent(Some(right));
            self.nodes.get_mut(right).push_child_front(moved);
        }

        trace!("rotate clockwise across separator {pos} of {parent:?}");
    }

    /// Mirror image of [`rotate_cw`](Self::rotate_cw): the right child's
    /// first key displaces the separator, which joins the left child's back.
    fn rotate_ccw(&mut self, parent: NodeId, pos: usize) {
        let left = self.nodes.get(parent).child(pos);
        let right = self.nodes.get(parent).child(pos + 1);

        let lent = self.nodes.get_mut(right).pop_key_front().unwrap();
        let separator = self.nodes.get_mut(parent).replace_key(pos, lent);
        self.nodes.get_mut(left).push_key_back(separator);

        if let Some(moved) = self.nodes.get_mut(right).pop_child_front() {
            self.nodes.get_mut(moved).set_parent(Some(left));
            self.nodes.get_mut(left).push_child_back(moved);
        }

        trace!("rotate counter-clockwise across separator {pos} of {parent:?}");
    }

    /// Collapses the separator at `pos`: the left child absorbs the
    /// separator key and the entire right sibling, which is freed. The
    /// parent loses one key and one child reference; if that leaves it
    /// deficient the fix-up continues there, terminating at the root.
    fn merge_children(&mut self, parent: NodeId, pos: usize) {
        let left = self.nodes.get(parent).child(pos);

        let separator = self.nodes.get_mut(parent).remove_key(pos);
        let right_id = self.nodes.get_mut(parent).remove_child(pos + 1);
        let right = self.nodes.take(right_id);

        for &moved in right.children() {
            self.nodes.get_mut(moved).set_parent(Some(left));
        }
        self.nodes.get_mut(left).merge_from(separator, right);

        trace!("merged {right_id:?} into {left:?}, separator {pos} pulled from {parent:?}");

        if parent != self.root && self.nodes.get(parent).key_count() < self.min_keys {
            self.fix_underflow(parent);
        }
    }

    /// An empty internal root has exactly one child left; that child
    /// becomes the root. The only place the tree loses height.
    fn collapse_root(&mut self) {
        let old_root = self.root;
        let child = self.nodes.get(old_root).child(0);
        self.nodes.free(old_root);
        self.nodes.get_mut(child).set_parent(None);
        self.root = child;

        trace!("empty root {old_root:?} collapsed into {child:?}");
    }
}
