//! Errors raised by tree mutation and the sync engine.
//!
//! Parsing and serialization are total and never fail; only structural
//! edits can be rejected.

use thiserror::Error;

use super::NodeId;

/// A reparent request the tree refused.
///
/// The tree is left exactly as it was: nothing is detached when the
/// request fails.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReparentError {
    /// The node was asked to become its own parent.
    #[error("node {node} cannot be its own parent")]
    SelfParent { node: NodeId },

    /// The target lives inside the moved node's subtree.
    #[error("node {node} cannot move under its descendant {new_parent}")]
    WouldCycle { node: NodeId, new_parent: NodeId },

    /// One of the ids is not in this tree.
    #[error("node {0} is not part of the tree")]
    UnknownNode(NodeId),

    /// The root would leave the root slot and strand the whole outline.
    #[error("root node {node} cannot move under detached node {new_parent}")]
    DetachesRoot { node: NodeId, new_parent: NodeId },
}

/// Errors surfaced by [`SyncEngine`](super::SyncEngine) operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    #[error(transparent)]
    InvalidReparent(#[from] InvalidReparentError),
}
