use std::collections::VecDeque;

use derive_more::Display;

use super::{NodeHandle, NodeId};

/// What a node is. Content only exists on files, so file-only operations
/// cannot be applied to a directory value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File { content: String },
    Directory,
}

impl NodeKind {
    pub fn file() -> Self {
        NodeKind::File {
            content: String::new(),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File { .. })
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, NodeKind::Directory)
    }

    pub fn tag(&self) -> KindTag {
        match self {
            NodeKind::File { .. } => KindTag::File,
            NodeKind::Directory => KindTag::Directory,
        }
    }
}

/// Content-free discriminant of [`NodeKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum KindTag {
    File,
    Directory,
}

/// One element of the namespace.
///
/// Nodes live in the [`Tree`](super::Tree) arena. Children and parent are
/// stored as handles into that arena; the children vector is the single
/// source of truth for ordering, the three enumeration orders are views
/// over it.
#[derive(Debug, Clone)]
pub struct Node {
    pub(super) id: NodeId,
    pub(super) name: String,
    pub(super) kind: NodeKind,
    pub(super) children: Vec<NodeHandle>,
    pub(super) parent: Option<NodeHandle>,
}

impl Node {
    pub(super) fn new(id: NodeId, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Children in insertion order, oldest first.
    pub fn children(&self) -> std::slice::Iter<'_, NodeHandle> {
        self.children.iter()
    }

    /// Children most recent first.
    pub fn latest_children(&self) -> std::iter::Rev<std::slice::Iter<'_, NodeHandle>> {
        self.children.iter().rev()
    }

    /// Children queued in arrival order, to be drained from the front.
    pub fn arrival_queue(&self) -> VecDeque<NodeHandle> {
        self.children.iter().copied().collect()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// `None` for directories.
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory => None,
        }
    }

    /// Replaces the content of a file. Returns `false` and does nothing on a
    /// directory.
    pub fn set_content(&mut self, text: impl Into<String>) -> bool {
        match &mut self.kind {
            NodeKind::File { content } => {
                *content = text.into();
                true
            }
            NodeKind::Directory => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_file_has_empty_content() {
        let node = Node::new(NodeId(1), "a.txt", NodeKind::file());
        assert!(node.is_file());
        assert_eq!(node.content(), Some(""));
        assert_eq!(node.parent(), None);
        assert_eq!(node.child_count(), 0);
    }

    #[test]
    fn directory_has_no_content() {
        let mut node = Node::new(NodeId(1), "docs", NodeKind::Directory);
        assert!(node.is_directory());
        assert_eq!(node.content(), None);
        assert!(!node.set_content("ignored"));
        assert_eq!(node.content(), None);
    }

    #[test]
    fn set_content_replaces_previous_text() {
        let mut node = Node::new(NodeId(1), "a.txt", NodeKind::file());
        assert!(node.set_content("first"));
        assert!(node.set_content("second"));
        assert_eq!(node.content(), Some("second"));
    }

    #[test]
    fn child_views_share_one_order() {
        let mut node = Node::new(NodeId(0), "root", NodeKind::Directory);
        node.children = (1..=3).map(NodeHandle::new).collect();

        let forward: Vec<_> = node.children().copied().collect();
        let latest: Vec<_> = node.latest_children().copied().collect();
        let mut queue = node.arrival_queue();
        let drained: Vec<_> = std::iter::from_fn(|| queue.pop_front()).collect();

        assert_eq!(forward, vec![NodeHandle::new(1), NodeHandle::new(2), NodeHandle::new(3)]);
        assert_eq!(latest, vec![NodeHandle::new(3), NodeHandle::new(2), NodeHandle::new(1)]);
        assert_eq!(drained, forward);
    }

    #[test]
    fn kind_tag_display() {
        assert_eq!(NodeKind::file().tag().to_string(), "File");
        assert_eq!(NodeKind::Directory.tag().to_string(), "Directory");
    }
}
