use std::path::PathBuf;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::TreeStyle;
use crate::editor::Direction;

use super::{App, Focus, Message, Model, ToastLevel, update};

fn model_with(text: &str) -> Model {
    Model::new(PathBuf::from("test.md"), text, (80, 24))
}

fn apply(model: Model, msgs: impl IntoIterator<Item = Message>) -> Model {
    msgs.into_iter().fold(model, update)
}

fn selected_label(model: &Model) -> Option<&str> {
    model
        .tree_pane
        .selected
        .and_then(|id| model.engine.tree().label(id))
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn click(column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

#[test]
fn test_new_model_parses_text_and_selects_root() {
    let model = model_with("- Root\n  - Child");
    assert_eq!(model.tree_pane.order().len(), 2);
    assert_eq!(selected_label(&model), Some("Root"));
    assert_eq!(model.title(), "Root");
    assert!(!model.is_dirty());
}

#[test]
fn test_typing_rebuilds_tree() {
    let model = model_with("- Root");
    let model = apply(
        model,
        [
            Message::EditorMoveEnd,
            Message::EditorSplitLine,
            Message::EditorIndent,
            Message::EditorInsertChar('C'),
        ],
    );

    assert_eq!(model.editor.text(), "- Root\n  - C");
    let tree = model.engine.tree();
    let root = tree.root().unwrap();
    let children: Vec<_> = tree
        .children(root)
        .iter()
        .filter_map(|&id| tree.label(id))
        .collect();
    assert_eq!(children, ["C"]);
    assert_eq!(selected_label(&model), Some("C"));
    assert!(model.is_dirty());
}

#[test]
fn test_cursor_movement_selects_node() {
    let model = model_with("- Root\n  - A\nnotes about a\n  - B");
    let model = apply(model, [Message::EditorMoveCursor(Direction::Down)]);
    assert_eq!(selected_label(&model), Some("A"));

    let model = apply(model, [Message::EditorMoveCursor(Direction::Down)]);
    assert_eq!(selected_label(&model), Some("A"), "body text belongs to A");

    let model = apply(model, [Message::EditorMoveTo(3, 0)]);
    assert_eq!(selected_label(&model), Some("B"));
}

#[test]
fn test_tree_navigation_and_activate_jumps_editor() {
    let model = model_with("- Root\n  - A\n  - B");
    let model = apply(model, [Message::TreeDown, Message::TreeDown, Message::TreeDown]);
    assert_eq!(selected_label(&model), Some("B"), "selection stops at the last row");

    let model = apply(model, [Message::TreeUp, Message::TreeActivate]);
    assert_eq!(selected_label(&model), Some("A"));
    assert_eq!(model.editor.cursor().line, 1);
    assert_eq!(model.editor.cursor().col, 5);
}

#[test]
fn test_mark_and_drop_reparents_through_editor() {
    let model = model_with("- Root\n  - A\n  - B");
    let model = apply(
        model,
        [
            Message::TreeDown,
            Message::TreeMark,
            Message::TreeDown,
            Message::TreeDrop,
        ],
    );

    assert_eq!(model.editor.text(), "- Root\n  - B\n    - A");
    assert_eq!(model.tree_pane.marked, None);
    assert_eq!(selected_label(&model), Some("A"));
    assert_eq!(model.editor.cursor().line, 2);
    assert!(model.is_dirty());
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Info));
}

#[test]
fn test_drop_onto_descendant_warns_and_keeps_text() {
    let model = model_with("- Root\n  - Child1\n  - Child2");
    let model = apply(
        model,
        [Message::TreeMark, Message::TreeDown, Message::TreeDrop],
    );

    assert_eq!(model.editor.text(), "- Root\n  - Child1\n  - Child2");
    assert!(!model.is_dirty());
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Warning);
    assert!(message.contains("descendant"), "got: {message}");
}

#[test]
fn test_drop_without_mark_is_a_hint() {
    let model = apply(model_with("- Root\n  - A"), [Message::TreeDrop]);
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Info));
    assert_eq!(model.editor.text(), "- Root\n  - A");
}

#[test]
fn test_editing_clears_stale_mark() {
    let model = model_with("- Root\n  - A");
    let model = apply(
        model,
        [Message::TreeMark, Message::EditorInsertChar('x')],
    );
    assert_eq!(model.tree_pane.marked, None);
}

#[test]
fn test_quit_with_unsaved_changes_requires_confirmation() {
    let model = apply(model_with("- a"), [Message::EditorInsertChar('x')]);
    let model = update(model, Message::Quit);
    assert!(!model.should_quit);
    assert!(model.quit_confirmed);

    let model = update(model, Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_other_messages_reset_quit_confirmation() {
    let model = apply(
        model_with("- a"),
        [
            Message::EditorInsertChar('x'),
            Message::Quit,
            Message::EditorMoveHome,
            Message::Quit,
        ],
    );
    assert!(!model.should_quit);
}

#[test]
fn test_clean_quit_is_immediate() {
    let model = update(model_with("- a"), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_new_document_resets_buffer_and_path() {
    let mut model = model_with("- Root\n  - A");
    model.file_path = PathBuf::from("plan.md");
    let model = update(model, Message::NewDocument);

    assert_eq!(model.editor.text(), "");
    assert_eq!(model.engine.tree().root(), None);
    assert_eq!(model.file_path, PathBuf::from("untitled.md"));
}

#[test]
fn test_new_document_with_unsaved_changes_asks_first() {
    let model = apply(model_with("- a"), [Message::EditorInsertChar('x'), Message::NewDocument]);
    assert_eq!(model.editor.text(), "x- a");
    let model = update(model, Message::NewDocument);
    assert_eq!(model.editor.text(), "");
}

#[test]
fn test_toggle_tree_returns_focus_to_editor() {
    let model = apply(model_with("- a"), [Message::SwitchFocus]);
    assert_eq!(model.focus, Focus::Tree);

    let model = update(model, Message::ToggleTree);
    assert!(!model.tree_visible);
    assert_eq!(model.focus, Focus::Editor);

    let model = update(model, Message::SwitchFocus);
    assert_eq!(model.focus, Focus::Editor, "no tree to focus");
}

#[test]
fn test_global_keys() {
    let model = model_with("- a");
    assert_eq!(App::handle_event(&ctrl('s'), &model), Some(Message::Save));
    assert_eq!(App::handle_event(&ctrl('q'), &model), Some(Message::Quit));
    assert_eq!(App::handle_event(&ctrl('n'), &model), Some(Message::NewDocument));
    assert_eq!(App::handle_event(&ctrl('t'), &model), Some(Message::ToggleTree));
    assert_eq!(App::handle_event(&key(KeyCode::Tab), &model), Some(Message::SwitchFocus));
    assert_eq!(App::handle_event(&key(KeyCode::F(1)), &model), Some(Message::ToggleHelp));
}

#[test]
fn test_letters_depend_on_focus() {
    let mut model = model_with("- a");
    assert_eq!(
        App::handle_event(&key(KeyCode::Char('m')), &model),
        Some(Message::EditorInsertChar('m'))
    );
    assert_eq!(
        App::handle_event(&key(KeyCode::Char('?')), &model),
        Some(Message::EditorInsertChar('?'))
    );

    model.focus = Focus::Tree;
    assert_eq!(App::handle_event(&key(KeyCode::Char('m')), &model), Some(Message::TreeMark));
    assert_eq!(App::handle_event(&key(KeyCode::Char('p')), &model), Some(Message::TreeDrop));
    assert_eq!(App::handle_event(&key(KeyCode::Char('j')), &model), Some(Message::TreeDown));
    assert_eq!(App::handle_event(&key(KeyCode::Esc), &model), Some(Message::TreeClearMark));
}

#[test]
fn test_alt_arrows_indent() {
    let model = model_with("- a");
    let alt_right = Event::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::ALT));
    let alt_left = Event::Key(KeyEvent::new(KeyCode::Left, KeyModifiers::ALT));
    assert_eq!(App::handle_event(&alt_right, &model), Some(Message::EditorIndent));
    assert_eq!(App::handle_event(&alt_left, &model), Some(Message::EditorOutdent));
}

#[test]
fn test_any_key_closes_help() {
    let model = update(model_with("- a"), Message::ToggleHelp);
    assert_eq!(
        App::handle_event(&key(KeyCode::Char('x')), &model),
        Some(Message::HideHelp)
    );
}

#[test]
fn test_click_on_tree_row() {
    // 80 columns: editor takes 32, the tree pane starts at column 32
    let model = model_with("- Root\n  - A\n  - B");
    assert_eq!(App::handle_event(&click(40, 2), &model), Some(Message::TreeClick(1)));
    assert_eq!(App::handle_event(&click(40, 20), &model), None);

    let model = update(model, Message::TreeClick(2));
    assert_eq!(selected_label(&model), Some("B"));
    assert_eq!(model.focus, Focus::Tree);
    assert_eq!(model.editor.cursor().line, 2);
}

#[test]
fn test_click_after_tree_shrinks_hits_drawn_row() {
    let children: String = (0..60).map(|i| format!("\n  - n{i}")).collect();
    let mut model = model_with(&format!("- R{children}"));
    model.tree_pane.scroll_offset = 40;

    model
        .engine
        .on_text_changed("- R\n  - a\n  - b\n  - c", &mut model.tree_pane);
    assert_eq!(model.tree_pane.order().len(), 4);

    assert_eq!(App::handle_event(&click(40, 1), &model), Some(Message::TreeClick(0)));
    let model = update(model, Message::TreeClick(0));
    assert_eq!(selected_label(&model), Some("R"));
    assert_eq!(model.editor.cursor().line, 0);
}

#[test]
fn test_click_in_editor_moves_cursor() {
    // border at column 0, one-digit gutter plus a space
    let model = model_with("- Root\n  - A");
    assert_eq!(
        App::handle_event(&click(5, 1), &model),
        Some(Message::EditorMoveTo(0, 2))
    );
    assert_eq!(
        App::handle_event(&click(30, 2), &model),
        Some(Message::EditorMoveTo(1, 5))
    );
}

#[test]
fn test_initial_model_applies_startup_options() {
    let app = App::new(PathBuf::from("plan.md"))
        .with_tree_focus(true)
        .with_tree_style(TreeStyle::Ascii);
    let model = app.initial_model("- a", (80, 24));
    assert_eq!(model.focus, Focus::Tree);
    assert_eq!(model.tree_style, TreeStyle::Ascii);

    let hidden = App::new(PathBuf::from("plan.md"))
        .with_tree_visible(false)
        .with_tree_focus(true)
        .initial_model("- a", (80, 24));
    assert_eq!(hidden.focus, Focus::Editor);
}

#[test]
fn test_resize_updates_size() {
    let model = update(model_with("- a"), Message::Resize(120, 40));
    assert_eq!(model.size, (120, 40));
}
