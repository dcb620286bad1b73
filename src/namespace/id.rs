use derive_more::{Display, From, Into};

/// Identity of a node. Assigned once from an [`IdGenerator`] and only
/// changed through [`Tree::override_id`](super::Tree::override_id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[display("{_0}")]
pub struct NodeId(pub u64);

/// Stable index of a node inside the tree's arena.
///
/// Slots are never reused, so a handle to a deleted node stays detectably
/// stale instead of silently aliasing a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
#[display("@{_0}")]
pub struct NodeHandle(usize);

impl NodeHandle {
    pub(crate) const fn new(index: usize) -> Self {
        NodeHandle(index)
    }

    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

/// Hands out strictly increasing node ids, starting at the seed.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new(seed: u64) -> Self {
        Self { next: seed }
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}
