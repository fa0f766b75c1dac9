use thiserror::Error;

/// Errors reported when constructing a tree from invalid parameters.
///
/// Runtime misses (looking up or removing an absent key) are ordinary
/// negative results, not errors; this type only covers configuration
/// rejected up front.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum TreeError {
    /// The requested node order is too small to form a valid B-tree.
    ///
    /// An order below 3 cannot satisfy the split invariants: promoting the
    /// middle key of an overflowing node must leave both halves non-empty.
    #[error("tree order must be at least 3, got {0}")]
    InvalidOrder(usize),
}
