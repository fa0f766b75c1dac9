use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::error::TreeError;
use crate::ordering::{Comparator, NaturalOrder};
use crate::raw::{NodeId, RawTree};

/// An ordered set based on a B-tree with a configurable node order.
///
/// The order is the maximum number of keys a node may hold; it must be at
/// least 3 and is fixed at construction. Keys are arranged by a
/// [`Comparator`] supplied up front, with [`NaturalOrder`] (the `Ord`
/// ordering) as the default. Two keys are considered equal when neither is
/// less than the other, so the set never requires `K: Eq`.
///
/// It is a logic error for the comparator to be inconsistent across calls,
/// or for a key to be mutated in a way that changes how it compares while it
/// is in the set. The behavior resulting from such a logic error is not
/// specified and may include panics, incorrect results, and non-termination,
/// but will never be undefined behavior.
///
/// The set is single-threaded: share it across threads behind external
/// synchronization or not at all.
///
/// # Examples
///
/// ```
/// use mway_tree::MwayTreeSet;
///
/// let mut books = MwayTreeSet::new(4)?;
///
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
///
/// if !books.contains(&"The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.", books.len());
/// }
///
/// books.remove(&"The Odyssey");
///
/// for book in &books {
///     println!("{book}");
/// }
/// # Ok::<(), mway_tree::TreeError>(())
/// ```
#[derive(Clone)]
pub struct MwayTreeSet<K, C = NaturalOrder> {
    raw: RawTree<K, C>,
}

impl<K: Ord> MwayTreeSet<K, NaturalOrder> {
    /// Creates an empty set of the given order, keyed by the `Ord` ordering.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidOrder`] if `order < 3`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::{MwayTreeSet, TreeError};
    ///
    /// let set: MwayTreeSet<i32> = MwayTreeSet::new(16)?;
    /// assert!(set.is_empty());
    ///
    /// assert_eq!(MwayTreeSet::<i32>::new(2).unwrap_err(), TreeError::InvalidOrder(2));
    /// # Ok::<(), TreeError>(())
    /// ```
    pub fn new(order: usize) -> Result<Self, TreeError> {
        Self::with_comparator(order, NaturalOrder)
    }
}

impl<K, C: Comparator<K>> MwayTreeSet<K, C> {
    /// Creates an empty set of the given order, keyed by `cmp`.
    ///
    /// The comparator must be a strict total order; see [`Comparator`].
    /// Closures taking two key references work directly.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidOrder`] if `order < 3`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::MwayTreeSet;
    ///
    /// let mut by_length = MwayTreeSet::with_comparator(4, |a: &&str, b: &&str| a.len() < b.len())?;
    /// by_length.insert("kiwi");
    /// by_length.insert("fig");
    /// by_length.insert("banana");
    ///
    /// assert_eq!(by_length.first(), Some(&"fig"));
    /// // "plum" compares equal to the already-stored "kiwi" by length.
    /// assert!(!by_length.insert("plum"));
    /// # Ok::<(), mway_tree::TreeError>(())
    /// ```
    pub fn with_comparator(order: usize, cmp: C) -> Result<Self, TreeError> {
        Ok(Self {
            raw: RawTree::new(order, cmp)?,
        })
    }

    /// Adds a key to the set.
    ///
    /// Returns true if it was not already present; inserting an equal key
    /// again is a no-op that keeps the stored key.
    pub fn insert(&mut self, key: K) -> bool {
        self.raw.insert(key)
    }

    /// Removes a key from the set. Returns true if it was present; removing
    /// an absent key is a no-op.
    pub fn remove(&mut self, key: &K) -> bool {
        self.raw.remove(key)
    }

    /// Returns true if an equal key is in the set.
    pub fn contains(&self, key: &K) -> bool {
        self.raw.contains(key)
    }

    /// Returns a reference to the stored key equal to `key`, if any.
    ///
    /// Useful with comparators under which distinct keys compare equal.
    pub fn get(&self, key: &K) -> Option<&K> {
        self.raw.get(key)
    }
}

impl<K, C> MwayTreeSet<K, C> {
    /// Returns the number of keys in the set.
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the set contains no keys.
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The configured node order: the maximum keys per node.
    pub const fn order(&self) -> usize {
        self.raw.order()
    }

    /// Number of node levels, 1 for an empty set. Grows by one on a root
    /// split and shrinks by one on a root collapse, never otherwise.
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Removes all keys.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// The smallest key under the set's ordering, if any.
    pub fn first(&self) -> Option<&K> {
        self.raw.first()
    }

    /// The greatest key under the set's ordering, if any.
    pub fn last(&self) -> Option<&K> {
        self.raw.last()
    }

    /// Calls `visitor` once per key, ascending under the set's ordering.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::MwayTreeSet;
    ///
    /// let mut set = MwayTreeSet::new(3)?;
    /// set.extend([3, 1, 2]);
    ///
    /// let mut doubled = Vec::new();
    /// set.traverse(|&key: &i32| doubled.push(key * 2));
    /// assert_eq!(doubled, [2, 4, 6]);
    /// # Ok::<(), mway_tree::TreeError>(())
    /// ```
    pub fn traverse<F: FnMut(&K)>(&self, mut visitor: F) {
        self.raw.traverse(&mut visitor);
    }

    /// Returns an iterator over the keys, ascending under the set's
    /// ordering.
    pub fn iter(&self) -> Iter<'_, K, C> {
        let mut iter = Iter {
            tree: &self.raw,
            stack: SmallVec::new(),
            remaining: self.len(),
        };
        iter.descend_first(self.raw.root());
        iter
    }
}

impl<K: fmt::Debug, C> fmt::Debug for MwayTreeSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, C> PartialEq for MwayTreeSet<K, C> {
    /// Sets are equal when they hold equal keys in the same order; the
    /// comparators themselves are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, C> Eq for MwayTreeSet<K, C> {}

impl<K, C: Comparator<K>> Extend<K> for MwayTreeSet<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K, C> IntoIterator for &'a MwayTreeSet<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, C>;

    fn into_iter(self) -> Iter<'a, K, C> {
        self.iter()
    }
}

/// An iterator over the keys of a [`MwayTreeSet`] in ascending order.
///
/// Created by [`MwayTreeSet::iter`]. Walks the tree with an explicit
/// descent stack: each entry is a node id and the index of the next key to
/// yield there.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, C> {
    tree: &'a RawTree<K, C>,
    stack: SmallVec<[(NodeId, usize); 12]>,
    remaining: usize,
}

impl<K, C> Iter<'_, K, C> {
    /// Pushes the path down to the leftmost leaf of the subtree at `id`.
    fn descend_first(&mut self, mut id: NodeId) {
        loop {
            self.stack.push((id, 0));
            let node = self.tree.node(id);
            if node.is_leaf() {
                break;
            }
            id = node.child(0);
        }
    }
}

impl<'a, K, C> Iterator for Iter<'a, K, C> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let tree = self.tree;

        loop {
            let &(id, index) = self.stack.last()?;
            let node = tree.node(id);

            if index < node.key_count() {
                self.stack.last_mut().unwrap().1 += 1;
                // The subtree left of this key is exhausted; queue the one
                // to its right before handing the key out.
                if !node.is_leaf() {
                    self.descend_first(node.child(index + 1));
                }
                self.remaining -= 1;
                return Some(node.key(index));
            }

            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, C> ExactSizeIterator for Iter<'_, K, C> {}

impl<K, C> FusedIterator for Iter<'_, K, C> {}

impl<K, C> fmt::Debug for Iter<'_, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.remaining).finish()
    }
}
