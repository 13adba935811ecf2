use crate::app::Model;
use crate::app::model::{DEFAULT_FILE_NAME, Focus, ToastLevel};
use crate::editor::Direction;

/// All possible events and actions in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editor
    /// Insert a character at the cursor
    EditorInsertChar(char),
    /// Enter: split the line, continuing a list marker
    EditorSplitLine,
    /// Backspace
    EditorDeleteBack,
    /// Delete
    EditorDeleteForward,
    /// Push the current line one level deeper
    EditorIndent,
    /// Pull the current line one level up
    EditorOutdent,
    EditorMoveCursor(Direction),
    EditorMoveHome,
    EditorMoveEnd,
    /// Move the cursor to (line, col), e.g. from a mouse click
    EditorMoveTo(usize, usize),
    EditorScrollUp(usize),
    EditorScrollDown(usize),

    // Tree
    /// Select the previous node
    TreeUp,
    /// Select the next node
    TreeDown,
    /// Jump the editor to the selected node
    TreeActivate,
    /// Select the node on a visible row and jump to it
    TreeClick(usize),
    /// Mark the selected node for moving
    TreeMark,
    /// Move the marked node under the selected one
    TreeDrop,
    /// Forget the mark
    TreeClearMark,
    TreeScrollUp,
    TreeScrollDown,

    // Layout
    /// Show or hide the tree pane
    ToggleTree,
    /// Switch focus between editor and tree
    SwitchFocus,
    ToggleHelp,
    HideHelp,
    /// Terminal resized
    Resize(u16, u16),

    // File
    /// Write the editor text to disk
    Save,
    /// Start an empty untitled document
    NewDocument,

    // Application
    Quit,
}

impl Message {
    const fn changes_text(&self) -> bool {
        matches!(
            self,
            Self::EditorInsertChar(_)
                | Self::EditorSplitLine
                | Self::EditorDeleteBack
                | Self::EditorDeleteForward
                | Self::EditorIndent
                | Self::EditorOutdent
        )
    }

    const fn moves_cursor(&self) -> bool {
        matches!(
            self,
            Self::EditorMoveCursor(_)
                | Self::EditorMoveHome
                | Self::EditorMoveEnd
                | Self::EditorMoveTo(..)
        )
    }
}

/// Pure state transition; file I/O for `Save` happens in the event loop.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Save keeps a pending quit alive so Ctrl+S, Ctrl+Q finishes cleanly.
    if !matches!(msg, Message::Quit | Message::Save) {
        model.quit_confirmed = false;
    }
    if !matches!(msg, Message::NewDocument) {
        model.new_confirmed = false;
    }

    let changes_text = msg.changes_text();
    let moves_cursor = msg.moves_cursor();

    match msg {
        Message::EditorInsertChar(ch) => model.editor.insert_char(ch),
        Message::EditorSplitLine => model.editor.split_line(),
        Message::EditorDeleteBack => {
            model.editor.delete_back();
        }
        Message::EditorDeleteForward => {
            model.editor.delete_forward();
        }
        Message::EditorIndent => {
            model.editor.indent_line();
        }
        Message::EditorOutdent => {
            model.editor.outdent_line();
        }
        Message::EditorMoveCursor(direction) => model.editor.move_cursor(direction),
        Message::EditorMoveHome => model.editor.move_home(),
        Message::EditorMoveEnd => model.editor.move_end(),
        Message::EditorMoveTo(line, col) => {
            model.focus = Focus::Editor;
            model.editor.move_to(line, col);
        }
        Message::EditorScrollUp(n) => {
            model.editor_scroll_offset = model.editor_scroll_offset.saturating_sub(n);
        }
        Message::EditorScrollDown(n) => {
            let max = model.editor.line_count().saturating_sub(1);
            model.editor_scroll_offset = (model.editor_scroll_offset + n).min(max);
        }

        Message::TreeUp => step_selection(&mut model, -1),
        Message::TreeDown => step_selection(&mut model, 1),
        Message::TreeActivate => {
            if let Some(node) = model.tree_pane.selected {
                model.jump_to_node(node);
            }
        }
        Message::TreeClick(row) => {
            model.focus = Focus::Tree;
            model.tree_pane.select_row(row);
            if let Some(node) = model.tree_pane.selected {
                model.jump_to_node(node);
            }
        }
        Message::TreeMark => {
            model.tree_pane.marked = model.tree_pane.selected;
            if let Some(label) = model
                .tree_pane
                .marked
                .and_then(|id| model.engine.tree().label(id))
            {
                let message = format!("Marked '{label}': select a new parent and press p");
                model.show_toast(ToastLevel::Info, message);
            }
        }
        Message::TreeDrop => model.drop_marked(),
        Message::TreeClearMark => model.tree_pane.marked = None,
        Message::TreeScrollUp => {
            let rows = model.tree_visible_rows();
            model.tree_pane.scroll_by(-1, rows);
        }
        Message::TreeScrollDown => {
            let rows = model.tree_visible_rows();
            model.tree_pane.scroll_by(1, rows);
        }

        Message::ToggleTree => {
            model.tree_visible = !model.tree_visible;
            if !model.tree_visible {
                model.focus = Focus::Editor;
            }
            model.follow_cursor();
        }
        Message::SwitchFocus => {
            model.focus = match model.focus {
                Focus::Editor if model.tree_visible => Focus::Tree,
                _ => Focus::Editor,
            };
        }
        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,
        Message::Resize(width, height) => {
            model.size = (width, height);
            model.ensure_cursor_visible();
            let rows = model.tree_visible_rows();
            model.tree_pane.ensure_visible(rows);
        }

        // Side effect in the event loop
        Message::Save => {}
        Message::NewDocument => {
            if model.is_dirty() && !model.new_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+N again to discard, or Ctrl+S to save",
                );
                model.new_confirmed = true;
            } else {
                model.load_text("");
                model.file_path = DEFAULT_FILE_NAME.into();
                model.new_confirmed = false;
                model.show_toast(ToastLevel::Info, "New document");
            }
        }
        Message::Quit => {
            if model.is_dirty() && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+Q again to quit, or Ctrl+S to save",
                );
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }
    }

    if changes_text {
        model.sync_text();
    } else if moves_cursor {
        model.follow_cursor();
    }
    model
}

fn step_selection(model: &mut Model, delta: isize) {
    model.tree_pane.step(delta);
    let rows = model.tree_visible_rows();
    model.tree_pane.ensure_visible(rows);
}
