//! In-memory hierarchical namespace.
//!
//! Nodes (files and directories) live in an arena owned by [`Tree`], which
//! also tracks the working-directory cursor. Children are kept in a single
//! insertion-ordered list and exposed in three orders: insertion, most
//! recent first, and drained from an arrival queue.

mod id;
mod listing;
mod node;
mod sort;
mod tree;

pub use id::{IdGenerator, NodeHandle, NodeId};
pub use listing::{Listing, ListingLabels};
pub use node::{KindTag, Node, NodeKind};
pub use sort::{SortedChildren, quicksort_by_key};
pub use tree::{Tree, TreeError};
