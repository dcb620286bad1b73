use snafu::prelude::*;
use tracing::debug;

use super::{IdGenerator, Listing, Node, NodeHandle, NodeId, NodeKind, SortedChildren, quicksort_by_key};

pub const ROOT_NAME: &str = "root";
pub const PARENT_TARGET: &str = "..";
pub const ROOT_TARGET: &str = "/";

/// Arena-backed namespace with a working-directory cursor.
///
/// Every node is owned by the arena. Parent links and the cursor are
/// handles, so removing a subtree can never leave a dangling reference:
/// the cursor is always a live directory, and removals that would
/// invalidate it are refused.
///
/// Freed slots are left empty and never handed out again, so a handle to a
/// deleted node stays detectably stale. The arena therefore grows with the
/// total number of nodes ever created, not the number currently live.
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Option<Node>>,
    root: NodeHandle,
    current: NodeHandle,
    ids: IdGenerator,
    live: usize,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::with_id_generator(IdGenerator::default())
    }

    /// The root takes the first id handed out by `ids`.
    pub fn with_id_generator(mut ids: IdGenerator) -> Self {
        let root = Node::new(ids.next_id(), ROOT_NAME, NodeKind::Directory);
        let handle = NodeHandle::new(0);
        Self {
            slots: vec![Some(root)],
            root: handle,
            current: handle,
            ids,
            live: 1,
        }
    }

    pub fn root(&self) -> NodeHandle {
        self.root
    }

    pub fn current(&self) -> NodeHandle {
        self.current
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.slots.get(handle.index()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.slots.get_mut(handle.index()).and_then(Option::as_mut)
    }

    fn live_node(&self, handle: NodeHandle) -> Result<&Node, TreeError> {
        self.node(handle).context(StaleHandleSnafu { handle })
    }

    fn cursor_node(&self) -> &Node {
        match self.node(self.current) {
            Some(node) => node,
            None => unreachable!("cursor always points at a live node"),
        }
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.live
    }

    pub fn current_node(&self) -> &Node {
        self.cursor_node()
    }

    /// Attaches `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeHandle, mut node: Node) -> Result<NodeHandle, TreeError> {
        let parent_node = self.live_node(parent)?;
        ensure!(
            parent_node.is_directory(),
            NotADirectorySnafu {
                name: parent_node.name()
            }
        );

        let handle = NodeHandle::new(self.slots.len());
        node.parent = Some(parent);
        debug!(
            "Attaching '{}' (id {}) as {} under {}",
            node.name(),
            node.id(),
            handle,
            parent
        );
        self.slots.push(Some(node));
        self.live += 1;
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.push(handle);
        }
        Ok(handle)
    }

    fn create(&mut self, name: &str, kind: NodeKind) -> NodeHandle {
        let node = Node::new(self.ids.next_id(), name, kind);
        match self.add_child(self.current, node) {
            Ok(handle) => handle,
            Err(_) => unreachable!("cursor always points at a live directory"),
        }
    }

    pub fn create_file(&mut self, name: &str) -> NodeHandle {
        self.create(name, NodeKind::file())
    }

    pub fn create_directory(&mut self, name: &str) -> NodeHandle {
        self.create(name, NodeKind::Directory)
    }

    /// Depth-first search from `from`.
    ///
    /// Match order: `from` itself, then for every child in insertion order,
    /// the child's subtree if it is a directory, then the child's own name.
    /// The walk keeps its own stack of `(directory, next child index)`
    /// frames, so depth is bounded by memory rather than the call stack.
    pub fn dfs(&self, from: NodeHandle, name: &str) -> Option<NodeHandle> {
        let node = self.node(from)?;
        if node.name() == name {
            return Some(from);
        }

        let mut frames = vec![(node, 0)];
        while let Some((directory, next)) = frames.last_mut() {
            let Some(&child) = directory.children.get(*next) else {
                frames.pop();
                continue;
            };
            *next += 1;
            let Some(child_node) = self.node(child) else {
                continue;
            };
            // A directory's subtree is entered with its own name as the
            // first candidate, which also covers the name check after it.
            if child_node.name() == name {
                return Some(child);
            }
            if child_node.is_directory() {
                frames.push((child_node, 0));
            }
        }
        None
    }

    pub fn find_node(&self, name: &str) -> Option<NodeHandle> {
        let hit = self.dfs(self.current, name);
        debug!("Lookup of '{}' from {}: {:?}", name, self.current, hit);
        hit
    }

    pub fn find_node_in_all(&self, name: &str) -> Option<NodeHandle> {
        let hit = self.dfs(self.root, name);
        debug!("Global lookup of '{}': {:?}", name, hit);
        hit
    }

    /// Moves the cursor to `target`: `..` for the parent, `/` for the root,
    /// anything else is resolved by depth-first search from the cursor.
    /// The cursor is left untouched on error.
    pub fn change_directory(&mut self, target: &str) -> Result<NodeHandle, TreeError> {
        match target {
            PARENT_TARGET => self.go_to_parent_directory(),
            ROOT_TARGET => {
                self.current = self.root;
                Ok(self.current)
            }
            name => {
                let handle = self.find_node(name).context(NotFoundSnafu { name })?;
                let node = self.live_node(handle)?;
                ensure!(node.is_directory(), NotADirectorySnafu { name });
                debug!("Cursor moves from {} to {}", self.current, handle);
                self.current = handle;
                Ok(handle)
            }
        }
    }

    pub fn go_to_parent_directory(&mut self) -> Result<NodeHandle, TreeError> {
        let parent = self.cursor_node().parent().context(NoParentSnafu)?;
        self.current = parent;
        Ok(parent)
    }

    /// First direct child of the cursor named `name`, of either kind.
    pub fn find_child(&self, name: &str) -> Option<NodeHandle> {
        self.cursor_node()
            .children()
            .copied()
            .find(|&child| self.node(child).is_some_and(|node| node.name() == name))
    }

    fn cursor_file(&self, file_name: &str) -> Option<NodeHandle> {
        self.cursor_node().children().copied().find(|&child| {
            self.node(child)
                .is_some_and(|node| node.is_file() && node.name() == file_name)
        })
    }

    /// Sets the content of the first file named `file_name` directly under
    /// the cursor. Returns `false` when there is none.
    pub fn set_content(&mut self, file_name: &str, text: &str) -> bool {
        let Some(handle) = self.cursor_file(file_name) else {
            debug!("No file '{}' under {} to write", file_name, self.current);
            return false;
        };
        self.node_mut(handle)
            .is_some_and(|node| node.set_content(text))
    }

    /// Content of the first file named `file_name` directly under the cursor.
    pub fn get_content(&self, file_name: &str) -> Option<&str> {
        self.cursor_file(file_name)
            .and_then(|handle| self.node(handle))
            .and_then(Node::content)
    }

    /// Cursor children in insertion order.
    pub fn list_all(&self) -> Listing {
        Listing::from_nodes(
            self.cursor_node()
                .children()
                .filter_map(|&child| self.node(child)),
        )
    }

    /// Cursor children, most recently created first.
    pub fn list_latest(&self) -> Listing {
        Listing::from_nodes(
            self.cursor_node()
                .latest_children()
                .filter_map(|&child| self.node(child)),
        )
    }

    /// Cursor children drained from the arrival queue, oldest first.
    pub fn list_oldest(&self) -> Listing {
        let mut queue = self.cursor_node().arrival_queue();
        let mut listing = Listing::default();
        while let Some(child) = queue.pop_front() {
            if let Some(node) = self.node(child) {
                listing.push(node);
            }
        }
        listing
    }

    /// Removes the first child of `parent` named `name` together with its
    /// whole subtree. `Ok(false)` if no child has that name.
    pub fn delete_child(&mut self, parent: NodeHandle, name: &str) -> Result<bool, TreeError> {
        let parent_node = self.live_node(parent)?;
        let Some(position) = parent_node
            .children()
            .position(|&child| self.node(child).is_some_and(|node| node.name() == name))
        else {
            return Ok(false);
        };
        let target = parent_node.children[position];
        ensure!(
            !self.is_within(self.current, target),
            CursorInSubtreeSnafu { name }
        );

        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.remove(position);
        }
        let freed = self.free_subtree(target);
        debug!("Deleted '{}' ({}), {} node(s) freed", name, target, freed);
        Ok(true)
    }

    pub fn delete_node(&mut self, name: &str) -> Result<bool, TreeError> {
        self.delete_child(self.current, name)
    }

    fn free_subtree(&mut self, top: NodeHandle) -> usize {
        let mut pending = vec![top];
        let mut freed = 0;
        while let Some(handle) = pending.pop() {
            if let Some(node) = self.slots.get_mut(handle.index()).and_then(Option::take) {
                pending.extend(node.children);
                freed += 1;
            }
        }
        self.live -= freed;
        freed
    }

    /// Whether `handle` is `ancestor` or lies below it.
    pub fn is_within(&self, handle: NodeHandle, ancestor: NodeHandle) -> bool {
        let mut cursor = Some(handle);
        while let Some(step) = cursor {
            if step == ancestor {
                return true;
            }
            cursor = self.node(step).and_then(Node::parent);
        }
        false
    }

    /// Orders `nodes` ascending by id in place. Stale handles sort first.
    pub fn sort_children_by_id(&self, nodes: &mut [NodeHandle]) {
        quicksort_by_key(nodes, |&handle| self.node(handle).map(Node::id));
    }

    /// Snapshot of `directory`'s children sorted by id, ready for lookups
    /// by id.
    pub fn sorted_children(&self, directory: NodeHandle) -> Result<SortedChildren, TreeError> {
        let node = self.live_node(directory)?;
        ensure!(
            node.is_directory(),
            NotADirectorySnafu { name: node.name() }
        );
        debug!(
            "Sorting {} child(ren) of '{}' by id",
            node.child_count(),
            node.name()
        );
        let entries = node
            .children()
            .filter_map(|&child| self.node(child).map(|child_node| (child_node.id(), child)))
            .collect();
        Ok(SortedChildren::from_unsorted(entries))
    }

    /// Replaces the id of a node, returning the old one. Nothing keeps ids
    /// unique after this.
    pub fn override_id(&mut self, handle: NodeHandle, id: NodeId) -> Result<NodeId, TreeError> {
        let node = self.node_mut(handle).context(StaleHandleSnafu { handle })?;
        let old = std::mem::replace(&mut node.id, id);
        debug!("Id of {} overridden: {} -> {}", handle, old, id);
        Ok(old)
    }

    /// Slash-separated path from the root, `/` for the root itself.
    pub fn path_of(&self, handle: NodeHandle) -> Option<String> {
        let mut names = Vec::new();
        let mut step = self.node(handle)?;
        while let Some(parent) = step.parent() {
            names.push(step.name());
            step = self.node(parent)?;
        }
        names.reverse();
        Some(format!("/{}", names.join("/")))
    }
}

#[derive(Debug, Snafu)]
pub enum TreeError {
    #[snafu(display("Already at the root, there is no parent directory"))]
    NoParent,
    #[snafu(display("No node named '{}'", name))]
    NotFound { name: String },
    #[snafu(display("'{}' is not a directory", name))]
    NotADirectory { name: String },
    #[snafu(display("Node {} no longer exists", handle))]
    StaleHandle { handle: NodeHandle },
    #[snafu(display("Cannot delete '{}' while the cursor is inside it", name))]
    CursorInSubtree { name: String },
}
