use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Label carried by the synthesized container of a multi-root outline.
pub const VIRTUAL_ROOT_LABEL: &str = "__virtual_root__";

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique node identity.
///
/// Ids come from a monotonically increasing counter, so they are never
/// reused and carry no information about position or text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// One outline entry stored in a [`Tree`](super::Tree) arena.
///
/// Structural links are read-only from outside the `outline` module; every
/// change goes through the tree so parent and child lists always agree.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    pub(super) label: String,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
    pub(super) font_size: Option<u16>,
    pub(super) font_color: Option<String>,
    pub(super) is_virtual: bool,
}

impl Node {
    pub(super) fn new(label: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            label: label.into(),
            parent: None,
            children: Vec::new(),
            font_size: None,
            font_color: None,
            is_virtual: false,
        }
    }

    pub(super) fn virtual_root() -> Self {
        Self {
            is_virtual: true,
            ..Self::new(VIRTUAL_ROOT_LABEL)
        }
    }

    pub const fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Font size override; `None` means the view default.
    pub const fn font_size(&self) -> Option<u16> {
        self.font_size
    }

    /// Font color override such as `#FF0000`; `None` means the view default.
    pub fn font_color(&self) -> Option<&str> {
        self.font_color.as_deref()
    }

    /// Whether this is the synthesized container of a multi-root outline.
    pub const fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
