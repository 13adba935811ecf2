//! Keeps outline text and tree in step without edit loops.
//!
//! The engine is the single owner of the tree. Text edits arrive through
//! [`SyncEngine::on_text_changed`]; structural edits through
//! [`SyncEngine::reparent`], which writes the new text back to the editor.
//! The editor reports that write as an ordinary change, and the engine must
//! not parse its own output a second time: that echo is what the
//! [`SyncState`] machine suppresses.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use super::{Dialect, LineIndex, NodeId, Parsed, SyncError, Tree, parse, serialize};

const TRACE_CAPACITY: usize = 256;

/// Which direction, if any, is being applied right now.
///
/// The two directions are mutually exclusive and never nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    ApplyingTreeToText,
    ApplyingTextToTree,
}

/// One recorded step of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    Transition { from: SyncState, to: SyncState },
    /// A text change arrived while the engine was writing text itself.
    Suppressed,
}

/// What [`SyncEngine::on_text_changed`] did with a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOutcome {
    Applied,
    Suppressed,
}

/// The editor side of the engine.
pub trait TextPort {
    /// Replace the whole editor text with `text`.
    ///
    /// Returns the change notification the write produced, if the editor
    /// emits one for programmatic writes. The engine feeds it straight back
    /// into [`SyncEngine::on_text_changed`], where it is suppressed.
    fn replace_text(&mut self, text: &str) -> Option<String>;
}

/// The tree-view side of the engine.
pub trait TreePort {
    /// The tree was rebuilt; ids from earlier trees are no longer valid.
    fn tree_replaced(&mut self, tree: &Tree, index: &LineIndex);
}

/// A view that does not display anything.
impl TreePort for () {
    fn tree_replaced(&mut self, _tree: &Tree, _index: &LineIndex) {}
}

#[derive(Debug, Clone, Default)]
pub struct SyncEngine {
    tree: Tree,
    index: LineIndex,
    dialect: Option<Dialect>,
    state: SyncState,
    trace: VecDeque<SyncStep>,
}

impl SyncEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine seeded from existing text without notifying anyone.
    pub fn from_text(text: &str) -> Self {
        let mut engine = Self::new();
        engine.apply(parse(text));
        engine
    }

    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    pub const fn index(&self) -> &LineIndex {
        &self.index
    }

    pub const fn state(&self) -> SyncState {
        self.state
    }

    /// Dialect of the text most recently parsed.
    pub const fn dialect(&self) -> Option<Dialect> {
        self.dialect
    }

    /// Canonical text for the current tree.
    pub fn canonical_text(&self) -> String {
        serialize(&self.tree)
    }

    /// Node parsed from `line` of the current text.
    pub fn node_at_line(&self, line: usize) -> Option<NodeId> {
        self.index.node_at_line(line)
    }

    pub fn line_of_node(&self, node: NodeId) -> Option<usize> {
        self.index.line_of_node(node)
    }

    /// Node to focus for an editor cursor on `line`: the entry on that line,
    /// or the nearest entry above it when the line is body text.
    pub fn node_for_cursor(&self, line: usize) -> Option<NodeId> {
        self.index.node_at_or_before(line)
    }

    /// Whether dropping `node` onto `target` would be accepted.
    pub fn can_reparent(&self, node: NodeId, target: NodeId) -> bool {
        self.tree.contains(node)
            && self.tree.contains(target)
            && node != target
            && !self.tree.is_descendant(node, target)
    }

    /// Forward an editor change.
    pub fn on_text_changed<V>(&mut self, text: &str, view: &mut V) -> TextOutcome
    where
        V: TreePort + ?Sized,
    {
        if self.state != SyncState::Idle {
            debug!(state = ?self.state, "text change suppressed");
            self.record(SyncStep::Suppressed);
            return TextOutcome::Suppressed;
        }

        self.enter(SyncState::ApplyingTextToTree);
        self.apply(parse(text));
        view.tree_replaced(&self.tree, &self.index);
        self.enter(SyncState::Idle);
        TextOutcome::Applied
    }

    /// Move `node` under `new_parent` and push the resulting text to the
    /// editor.
    ///
    /// The written text is parsed again so the line index describes what the
    /// editor now shows. Returns the moved node's id in that refreshed tree.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidReparent`] when the move would put a node
    /// under itself or its descendant, or names an unknown node. Nothing is
    /// written in that case.
    pub fn reparent<E, V>(
        &mut self,
        node: NodeId,
        new_parent: NodeId,
        editor: &mut E,
        view: &mut V,
    ) -> Result<Option<NodeId>, SyncError>
    where
        E: TextPort + ?Sized,
        V: TreePort + ?Sized,
    {
        if let Err(err) = self.tree.reparent(node, new_parent) {
            warn!(%err, "reparent rejected");
            return Err(err.into());
        }
        let moved_line = output_line(&self.tree, node);

        self.enter(SyncState::ApplyingTreeToText);
        let text = serialize(&self.tree);
        if let Some(echo) = editor.replace_text(&text) {
            self.on_text_changed(&echo, view);
        }
        self.apply(parse(&text));
        view.tree_replaced(&self.tree, &self.index);
        self.enter(SyncState::Idle);

        info!(%node, %new_parent, "node reparented");
        Ok(moved_line.and_then(|line| self.index.node_at_line(line)))
    }

    /// Drain the recorded state-machine steps, oldest first.
    pub fn take_trace(&mut self) -> Vec<SyncStep> {
        self.trace.drain(..).collect()
    }

    fn apply(&mut self, parsed: Parsed) {
        let Parsed {
            mut tree,
            index,
            dialect,
        } = parsed;
        let title = match tree.root_node() {
            Some(root) if !root.is_virtual() => root.label().to_string(),
            _ => self.tree.title().to_string(),
        };
        tree.set_title(title);
        self.tree = tree;
        self.index = index;
        self.dialect = dialect;
    }

    fn enter(&mut self, next: SyncState) {
        let from = self.state;
        self.state = next;
        debug!(?from, to = ?next, "sync transition");
        self.record(SyncStep::Transition { from, to: next });
    }

    fn record(&mut self, step: SyncStep) {
        if self.trace.len() == TRACE_CAPACITY {
            self.trace.pop_front();
        }
        self.trace.push_back(step);
    }
}

/// Line `id` lands on when `tree` is serialized: its position in pre-order,
/// not counting a virtual root.
fn output_line(tree: &Tree, id: NodeId) -> Option<usize> {
    tree.nodes()
        .into_iter()
        .filter(|&n| tree.get(n).is_some_and(|node| !node.is_virtual()))
        .position(|n| n == id)
}
