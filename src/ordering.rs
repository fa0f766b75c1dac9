use core::cmp::Ordering;

/// A strict total order over keys of type `K`, supplied at tree construction.
///
/// Implementations only have to provide [`less`](Comparator::less); equality
/// is derived from it (`a` and `b` are equal when neither is less than the
/// other), so a comparator never needs `K: Eq`.
///
/// The order must be *strict* and *total*: irreflexive, transitive, and
/// consistent across calls. A comparator that violates this is a logic error;
/// the tree will not detect it, and lookups and structure may become
/// arbitrarily wrong (but never unsound).
///
/// Closures work directly:
///
/// ```
/// use mway_tree::MwayTreeSet;
///
/// let mut set = MwayTreeSet::with_comparator(4, |a: &i32, b: &i32| a > b).unwrap();
/// set.insert(1);
/// set.insert(2);
/// set.insert(3);
///
/// // The comparator reverses the order, so iteration is descending.
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// ```
pub trait Comparator<K> {
    /// Returns true if `a` is strictly less than `b` under this order.
    fn less(&self, a: &K, b: &K) -> bool;

    /// The derived three-way comparison: `Equal` when neither key is less
    /// than the other.
    #[inline]
    fn cmp(&self, a: &K, b: &K) -> Ordering {
        if self.less(a, b) {
            Ordering::Less
        } else if self.less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// The [`Ord`]-derived comparator used when none is supplied.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NaturalOrder;

impl<K: Ord> Comparator<K> for NaturalOrder {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }

    #[inline]
    fn cmp(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}
