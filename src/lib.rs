//! An in-memory B-tree set with a configurable node order.
//!
//! This crate provides [`MwayTreeSet`], an ordered set backed by a multiway
//! balanced search tree. Unlike the standard library's `BTreeSet`, the
//! branching factor is chosen at construction time and the ordering is a
//! value, not a trait bound: any strict total order can be supplied as a
//! [`Comparator`] (closures included), with [`NaturalOrder`] filling in for
//! `Ord` key types.
//!
//! # Example
//!
//! ```
//! use mway_tree::MwayTreeSet;
//!
//! // Nodes hold at most 8 keys each.
//! let mut primes = MwayTreeSet::new(8)?;
//!
//! for p in [11, 2, 7, 3, 5] {
//!     primes.insert(p);
//! }
//! primes.insert(7); // already present, a no-op
//! primes.remove(&11);
//!
//! assert!(primes.contains(&5));
//! assert_eq!(primes.iter().copied().collect::<Vec<_>>(), [2, 3, 5, 7]);
//! # Ok::<(), mway_tree::TreeError>(())
//! ```
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to their parent and children by stable
//! index, so structural mutation (splits on overflow, rotations and merges
//! on underflow, root growth and collapse) never juggles simultaneously
//! borrowed nodes. All operations are O(log n); the tree is single-threaded
//! and purely in-memory.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod error;
mod ordering;
mod raw;

pub mod tree_set;

pub use error::TreeError;
pub use ordering::{Comparator, NaturalOrder};
pub use tree_set::MwayTreeSet;
