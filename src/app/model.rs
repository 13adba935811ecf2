use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::config::TreeStyle;
use crate::editor::EditorBuffer;
use crate::outline::{LineIndex, NodeId, SyncEngine, Tree, TreePort};

/// File written when no path was given on the command line.
pub const DEFAULT_FILE_NAME: &str = "untitled.md";

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    Tree,
}

/// Tree pane state: the visible node order, selection and move mark.
///
/// Node ids only live as long as one parse, so every rebuild drops
/// whatever no longer exists.
#[derive(Debug, Clone, Default)]
pub struct TreePane {
    order: Vec<NodeId>,
    pub selected: Option<NodeId>,
    pub marked: Option<NodeId>,
    pub scroll_offset: usize,
}

impl TreePane {
    /// Nodes in display order (pre-order, virtual root skipped).
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn selected_row(&self) -> Option<usize> {
        let selected = self.selected?;
        self.order.iter().position(|&id| id == selected)
    }

    pub fn select_row(&mut self, row: usize) {
        if let Some(&id) = self.order.get(row) {
            self.selected = Some(id);
        }
    }

    /// Move the selection by `delta` rows, starting at the top when nothing
    /// is selected.
    pub fn step(&mut self, delta: isize) {
        let Some(last) = self.order.len().checked_sub(1) else {
            return;
        };
        let row = self
            .selected_row()
            .map_or(0, |row| row.saturating_add_signed(delta).min(last));
        self.select_row(row);
    }

    /// Scroll so the selected row is inside a window of `rows` rows.
    pub fn ensure_visible(&mut self, rows: usize) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if rows == 0 {
            self.scroll_offset = row;
        } else if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + rows {
            self.scroll_offset = row + 1 - rows;
        }
    }

    /// First row drawn in a window of `rows` rows. A stale offset past the
    /// end is pulled back so the window stays full.
    pub fn effective_offset(&self, rows: usize) -> usize {
        self.scroll_offset.min(self.order.len().saturating_sub(rows))
    }

    pub fn scroll_by(&mut self, delta: isize, rows: usize) {
        let max = self.order.len().saturating_sub(rows.max(1));
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta).min(max);
    }
}

impl TreePort for TreePane {
    fn tree_replaced(&mut self, tree: &Tree, _index: &LineIndex) {
        self.order = tree
            .nodes()
            .into_iter()
            .filter(|&id| tree.get(id).is_some_and(|node| !node.is_virtual()))
            .collect();
        self.selected = self.selected.filter(|&id| tree.contains(id));
        self.marked = self.marked.filter(|&id| tree.contains(id));
        self.scroll_offset = self.scroll_offset.min(self.order.len().saturating_sub(1));
    }
}

/// The complete application state.
pub struct Model {
    pub engine: SyncEngine,
    pub editor: EditorBuffer,
    /// First editor line on screen
    pub editor_scroll_offset: usize,
    pub tree_pane: TreePane,
    pub tree_visible: bool,
    pub tree_style: TreeStyle,
    pub focus: Focus,
    pub file_path: PathBuf,
    /// Terminal size in cells
    pub size: (u16, u16),
    pub help_visible: bool,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    toast: Option<Toast>,
    pub should_quit: bool,
    /// Set after a first quit attempt with unsaved changes
    pub quit_confirmed: bool,
    /// Set after a first new-document attempt with unsaved changes
    pub new_confirmed: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("focus", &self.focus)
            .field("tree_visible", &self.tree_visible)
            .field("dirty", &self.editor.is_dirty())
            .finish_non_exhaustive()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(PathBuf::from(DEFAULT_FILE_NAME), "", (80, 24))
    }
}

impl Model {
    pub fn new(file_path: PathBuf, text: &str, size: (u16, u16)) -> Self {
        let mut model = Self {
            engine: SyncEngine::new(),
            editor: EditorBuffer::from_text(text),
            editor_scroll_offset: 0,
            tree_pane: TreePane::default(),
            tree_visible: true,
            tree_style: TreeStyle::default(),
            focus: Focus::default(),
            file_path,
            size,
            help_visible: false,
            config_global_path: None,
            config_local_path: None,
            toast: None,
            should_quit: false,
            quit_confirmed: false,
            new_confirmed: false,
        };
        model.load_text(text);
        model
    }

    /// Replace the whole document without marking it dirty.
    pub fn load_text(&mut self, text: &str) {
        self.editor.reset(text);
        self.editor_scroll_offset = 0;
        self.tree_pane = TreePane::default();
        self.engine.on_text_changed(text, &mut self.tree_pane);
        self.follow_cursor();
    }

    pub const fn is_dirty(&self) -> bool {
        self.editor.is_dirty()
    }

    pub fn title(&self) -> &str {
        self.engine.tree().title()
    }

    pub fn file_name(&self) -> String {
        self.file_path.file_name().map_or_else(
            || DEFAULT_FILE_NAME.to_string(),
            |s| s.to_string_lossy().to_string(),
        )
    }

    pub fn layout(&self) -> crate::ui::PaneLayout {
        let area = Rect::new(0, 0, self.size.0, self.size.1);
        crate::ui::layout(area, self.tree_visible, self.toast.is_some())
    }

    pub fn editor_visible_rows(&self) -> usize {
        usize::from(crate::ui::inner(self.layout().editor).height)
    }

    pub fn tree_visible_rows(&self) -> usize {
        self.layout()
            .tree
            .map_or(0, |area| usize::from(crate::ui::inner(area).height))
    }

    /// Forward a pending editor change to the engine and refocus the tree.
    pub(super) fn sync_text(&mut self) {
        if let Some(text) = self.editor.take_change() {
            self.engine.on_text_changed(&text, &mut self.tree_pane);
            self.follow_cursor();
        }
    }

    /// Select the node the editor cursor belongs to.
    pub(super) fn follow_cursor(&mut self) {
        let line = self.editor.cursor().line;
        if let Some(node) = self.engine.node_for_cursor(line) {
            self.tree_pane.selected = Some(node);
            let rows = self.tree_visible_rows();
            self.tree_pane.ensure_visible(rows);
        }
        self.ensure_cursor_visible();
    }

    /// Put the editor cursor at the end of `node`'s line.
    pub(super) fn jump_to_node(&mut self, node: NodeId) {
        let Some(line) = self.engine.line_of_node(node) else {
            return;
        };
        let col = self.editor.line_len(line);
        self.editor.move_to(line, col);
        self.ensure_cursor_visible();
    }

    pub(super) fn ensure_cursor_visible(&mut self) {
        let line = self.editor.cursor().line;
        let rows = self.editor_visible_rows();
        if rows == 0 || line < self.editor_scroll_offset {
            self.editor_scroll_offset = line;
        } else if line >= self.editor_scroll_offset + rows {
            self.editor_scroll_offset = line + 1 - rows;
        }
    }

    /// Move the marked node under the selected one.
    pub(super) fn drop_marked(&mut self) {
        let (Some(node), Some(target)) = (self.tree_pane.marked, self.tree_pane.selected) else {
            self.show_toast(ToastLevel::Info, "Mark a node with m first");
            return;
        };
        let label = |model: &Self, id| {
            model
                .engine
                .tree()
                .label(id)
                .unwrap_or_default()
                .to_string()
        };
        let (node_label, target_label) = (label(self, node), label(self, target));

        match self
            .engine
            .reparent(node, target, &mut self.editor, &mut self.tree_pane)
        {
            Ok(moved) => {
                self.tree_pane.marked = None;
                if let Some(moved) = moved {
                    self.tree_pane.selected = Some(moved);
                    self.jump_to_node(moved);
                    let rows = self.tree_visible_rows();
                    self.tree_pane.ensure_visible(rows);
                }
                self.show_toast(
                    ToastLevel::Info,
                    format!("Moved '{node_label}' under '{target_label}'"),
                );
            }
            Err(err) => {
                self.show_toast(ToastLevel::Warning, format!("Cannot move: {err}"));
            }
        }
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}
