use std::collections::{BTreeMap, HashMap};

use super::NodeId;

/// Bidirectional map between zero-based source lines and the nodes parsed
/// from them.
///
/// An index is produced by a single parse and describes exactly one text
/// snapshot. It is never patched: the next parse returns a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    by_line: BTreeMap<usize, NodeId>,
    by_node: HashMap<NodeId, usize>,
}

impl LineIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, line: usize, node: NodeId) {
        self.by_line.insert(line, node);
        self.by_node.insert(node, line);
    }

    pub fn node_at_line(&self, line: usize) -> Option<NodeId> {
        self.by_line.get(&line).copied()
    }

    pub fn line_of_node(&self, node: NodeId) -> Option<usize> {
        self.by_node.get(&node).copied()
    }

    /// The node on `line`, or on the closest indexed line above it.
    ///
    /// Used for cursor tracking: a cursor resting on body text focuses the
    /// entry that text belongs to.
    pub fn node_at_or_before(&self, line: usize) -> Option<NodeId> {
        self.by_line.range(..=line).next_back().map(|(_, &id)| id)
    }

    pub fn len(&self) -> usize {
        self.by_line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    /// `(line, node)` pairs in line order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.by_line.iter().map(|(&line, &id)| (line, id))
    }
}
