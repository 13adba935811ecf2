use std::collections::HashMap;

use super::node::{Node, NodeId};
use super::error::InvalidReparentError;

/// Title used until a document names itself.
pub const DEFAULT_TITLE: &str = "Untitled";

/// A named document owning every node in an arena.
///
/// The root is optional: an empty document has no root rather than an empty
/// sentinel node. Nodes reference each other by [`NodeId`]; the arena is the
/// only owner, so detaching a subtree and dropping it from the map is the
/// whole deletion story.
#[derive(Debug, Clone)]
pub struct Tree {
    title: String,
    root: Option<NodeId>,
    nodes: HashMap<NodeId, Node>,
}

/// Label-only structural snapshot of a subtree.
///
/// Two trees with equal shapes have the same labels in the same order at the
/// same depths, regardless of node identity or source lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub label: String,
    pub is_virtual: bool,
    pub children: Vec<Self>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::with_title(DEFAULT_TITLE)
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            root: None,
            nodes: HashMap::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn root_node(&self) -> Option<&Node> {
        self.root.and_then(|id| self.nodes.get(&id))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children of `id`, empty when the node is unknown.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(Node::label)
    }

    /// Create a detached node. It joins the outline once attached with
    /// [`append_child`](Self::append_child) or made the root.
    pub fn create_node(&mut self, label: impl Into<String>) -> NodeId {
        self.insert(Node::new(label))
    }

    pub(crate) fn create_virtual_root(&mut self) -> NodeId {
        self.insert(Node::virtual_root())
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = node.id();
        self.nodes.insert(id, node);
        id
    }

    /// Make `id` the root. The node is detached from any parent first and the
    /// previous root's subtree (minus `id`) is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidReparentError::UnknownNode`] if `id` is not in the arena.
    pub fn set_root(&mut self, id: NodeId) -> Result<(), InvalidReparentError> {
        if !self.contains(id) {
            return Err(InvalidReparentError::UnknownNode(id));
        }
        self.detach(id);
        if let Some(old) = self.root.replace(id)
            && old != id
        {
            self.drop_subtree(old);
        }
        Ok(())
    }

    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.label = label.into();
        true
    }

    pub fn set_font_size(&mut self, id: NodeId, size: Option<u16>) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.font_size = size;
        true
    }

    pub fn set_font_color(&mut self, id: NodeId, color: Option<String>) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.font_color = color;
        true
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// Equivalent to [`reparent(child, parent)`](Self::reparent): a child
    /// that already has a parent is moved.
    ///
    /// # Errors
    ///
    /// Same as [`reparent`](Self::reparent).
    pub fn append_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
    ) -> Result<(), InvalidReparentError> {
        self.reparent(child, parent)
    }

    /// Move `node` to the end of `new_parent`'s children.
    ///
    /// # Errors
    ///
    /// Rejects self-parenting, moves under a descendant, unknown ids and
    /// moving the root anywhere outside itself. A rejected call changes
    /// nothing.
    pub fn reparent(
        &mut self,
        node: NodeId,
        new_parent: NodeId,
    ) -> Result<(), InvalidReparentError> {
        for id in [node, new_parent] {
            if !self.contains(id) {
                return Err(InvalidReparentError::UnknownNode(id));
            }
        }
        if node == new_parent {
            return Err(InvalidReparentError::SelfParent { node });
        }
        if self.is_descendant(node, new_parent) {
            return Err(InvalidReparentError::WouldCycle { node, new_parent });
        }
        if self.root == Some(node) {
            return Err(InvalidReparentError::DetachesRoot { node, new_parent });
        }

        self.detach(node);
        if let Some(parent) = self.nodes.get_mut(&new_parent) {
            parent.children.push(node);
        }
        if let Some(child) = self.nodes.get_mut(&node) {
            child.parent = Some(new_parent);
        }
        Ok(())
    }

    /// True when `node` sits strictly inside `ancestor`'s subtree.
    pub fn is_descendant(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Detach `id` and drop its whole subtree. Returns the number of nodes
    /// removed (zero for an unknown id).
    pub fn remove(&mut self, id: NodeId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        self.detach(id);
        self.drop_subtree(id)
    }

    /// Drop every node and the root.
    pub fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
    }

    /// Number of ancestors between `id` and the top of its subtree.
    pub fn depth_of(&self, id: NodeId) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        Some(depth)
    }

    /// All nodes reachable from the root in depth-first pre-order, the root
    /// (virtual or not) first.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.root.map_or_else(Vec::new, |root| self.subtree(root))
    }

    /// `id` followed by all its descendants in pre-order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Structural snapshot of the attached tree.
    pub fn shape(&self) -> Option<Shape> {
        self.root.map(|root| self.shape_of(root))
    }

    fn shape_of(&self, id: NodeId) -> Shape {
        let node = &self.nodes[&id];
        Shape {
            label: node.label.clone(),
            is_virtual: node.is_virtual,
            children: node.children.iter().map(|&c| self.shape_of(c)).collect(),
        }
    }

    /// Put a freshly created node in the root slot.
    pub(super) fn install_root(&mut self, id: NodeId) {
        debug_assert!(self.root.is_none(), "root slot already taken");
        self.root = Some(id);
    }

    /// Append a freshly created, detached node under `parent`.
    pub(super) fn push_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert_eq!(self.parent(child), None, "{child} is already attached");
        if let Some(owner) = self.nodes.get_mut(&parent) {
            owner.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
    }

    /// Unlink `id` from its parent (or the root slot). The node stays in
    /// the arena.
    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(&id).and_then(|n| n.parent.take()) else {
            if self.root == Some(id) {
                self.root = None;
            }
            return;
        };
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.retain(|&c| c != id);
        }
    }

    fn drop_subtree(&mut self, id: NodeId) -> usize {
        let ids = self.subtree(id);
        for victim in &ids {
            self.nodes.remove(victim);
        }
        ids.len()
    }

    /// Panic unless every parent pointer matches its parent's child list.
    #[cfg(test)]
    pub(crate) fn assert_links_consistent(&self) {
        for (id, node) in &self.nodes {
            if let Some(parent) = node.parent {
                let owner = &self.nodes[&parent];
                assert_eq!(
                    owner.children.iter().filter(|&&c| c == *id).count(),
                    1,
                    "{id} must appear exactly once under {parent}"
                );
            }
            for child in &node.children {
                assert_eq!(self.nodes[child].parent, Some(*id), "{child} must point at {id}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Root(A(A1), B)
    fn sample() -> (Tree, [NodeId; 4]) {
        let mut tree = Tree::new();
        let root = tree.create_node("Root");
        let a = tree.create_node("A");
        let a1 = tree.create_node("A1");
        let b = tree.create_node("B");
        tree.set_root(root).unwrap();
        tree.append_child(root, a).unwrap();
        tree.append_child(a, a1).unwrap();
        tree.append_child(root, b).unwrap();
        (tree, [root, a, a1, b])
    }

    fn labels(tree: &Tree, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| tree.label(id).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_new_tree_is_empty_with_default_title() {
        let tree = Tree::new();
        assert_eq!(tree.title(), "Untitled");
        assert_eq!(tree.root(), None);
        assert!(tree.is_empty());
        assert!(tree.nodes().is_empty());
        assert_eq!(tree.shape(), None);
    }

    #[test]
    fn test_title_can_be_set() {
        let mut tree = Tree::with_title("Plan");
        assert_eq!(tree.title(), "Plan");
        tree.set_title("Roadmap");
        assert_eq!(tree.title(), "Roadmap");
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let (tree, [root, a, _, b]) = sample();
        assert_eq!(tree.children(root), &[a, b]);
        tree.assert_links_consistent();
    }

    #[test]
    fn test_nodes_are_preorder() {
        let (tree, _) = sample();
        assert_eq!(labels(&tree, &tree.nodes()), ["Root", "A", "A1", "B"]);
    }

    #[test]
    fn test_reparent_moves_to_end_of_new_parent() {
        let (mut tree, [root, a, a1, b]) = sample();
        tree.reparent(a1, b).unwrap();
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[a1]);
        assert_eq!(tree.parent(a1), Some(b));

        tree.reparent(a, b).unwrap();
        assert_eq!(tree.children(root), &[b]);
        assert_eq!(tree.children(b), &[a1, a]);
        tree.assert_links_consistent();
    }

    #[test]
    fn test_reparent_to_same_parent_moves_to_end() {
        let (mut tree, [root, a, _, b]) = sample();
        tree.reparent(a, root).unwrap();
        assert_eq!(tree.children(root), &[b, a]);
        tree.assert_links_consistent();
    }

    #[test]
    fn test_reparent_onto_self_is_rejected() {
        let (mut tree, [_, a, _, _]) = sample();
        let before = tree.shape();
        assert_eq!(
            tree.reparent(a, a),
            Err(InvalidReparentError::SelfParent { node: a })
        );
        assert_eq!(tree.shape(), before);
    }

    #[test]
    fn test_reparent_onto_descendant_is_rejected() {
        let (mut tree, [root, _, a1, _]) = sample();
        let before = tree.shape();
        assert_eq!(
            tree.reparent(root, a1),
            Err(InvalidReparentError::WouldCycle {
                node: root,
                new_parent: a1
            })
        );
        assert_eq!(tree.shape(), before);
        assert_eq!(tree.root(), Some(root));
        tree.assert_links_consistent();
    }

    #[test]
    fn test_reparent_unknown_node_is_rejected() {
        let (mut tree, [root, ..]) = sample();
        let mut other = Tree::new();
        let stranger = other.create_node("x");
        assert_eq!(
            tree.reparent(stranger, root),
            Err(InvalidReparentError::UnknownNode(stranger))
        );
    }

    #[test]
    fn test_root_cannot_move_under_detached_node() {
        let (mut tree, [root, ..]) = sample();
        let loose = tree.create_node("Loose");
        let before = tree.shape();

        assert_eq!(
            tree.reparent(root, loose),
            Err(InvalidReparentError::DetachesRoot {
                node: root,
                new_parent: loose,
            })
        );
        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.shape(), before);
        assert_eq!(tree.parent(loose), None);
        tree.assert_links_consistent();
    }

    #[test]
    fn test_is_descendant_is_strict() {
        let (tree, [root, a, a1, b]) = sample();
        assert!(tree.is_descendant(root, a1));
        assert!(tree.is_descendant(a, a1));
        assert!(!tree.is_descendant(a1, a));
        assert!(!tree.is_descendant(b, a1));
        assert!(!tree.is_descendant(a, a));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let (mut tree, [root, a, a1, b]) = sample();
        assert_eq!(tree.remove(a), 2);
        assert!(!tree.contains(a));
        assert!(!tree.contains(a1));
        assert_eq!(tree.children(root), &[b]);
        assert_eq!(tree.remove(a), 0);
        tree.assert_links_consistent();
    }

    #[test]
    fn test_remove_root_empties_tree() {
        let (mut tree, [root, ..]) = sample();
        assert_eq!(tree.remove(root), 4);
        assert_eq!(tree.root(), None);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_set_root_replaces_previous_root() {
        let (mut tree, [root, a, a1, _]) = sample();
        tree.set_root(a).unwrap();
        assert_eq!(tree.root(), Some(a));
        assert_eq!(tree.parent(a), None);
        assert!(!tree.contains(root));
        assert_eq!(labels(&tree, &tree.nodes()), ["A", "A1"]);
        assert_eq!(tree.len(), 2);
        assert!(tree.contains(a1));
        tree.assert_links_consistent();
    }

    #[test]
    fn test_depth_of() {
        let (tree, [root, a, a1, _]) = sample();
        assert_eq!(tree.depth_of(root), Some(0));
        assert_eq!(tree.depth_of(a), Some(1));
        assert_eq!(tree.depth_of(a1), Some(2));
    }

    #[test]
    fn test_presentation_hints_are_carried() {
        let (mut tree, [_, a, ..]) = sample();
        assert!(tree.set_font_size(a, Some(18)));
        assert!(tree.set_font_color(a, Some("#FF0000".to_string())));
        let node = tree.get(a).unwrap();
        assert_eq!(node.font_size(), Some(18));
        assert_eq!(node.font_color(), Some("#FF0000"));
    }

    #[test]
    fn test_set_label() {
        let (mut tree, [_, a, ..]) = sample();
        assert!(tree.set_label(a, "Alpha"));
        assert_eq!(tree.label(a), Some("Alpha"));
    }

    #[test]
    fn test_clear() {
        let (mut tree, _) = sample();
        tree.clear();
        assert_eq!(tree.root(), None);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_shape_ignores_identity() {
        let (first, _) = sample();
        let (second, _) = sample();
        assert_eq!(first.shape(), second.shape());
    }
}
