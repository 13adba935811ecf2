use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, Focus, Message, Model};
use crate::editor::Direction;

const SCROLL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(event: &Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q' | 'c') if ctrl => return Some(Message::Quit),
            KeyCode::Char('s') if ctrl => return Some(Message::Save),
            KeyCode::Char('n') if ctrl => return Some(Message::NewDocument),
            KeyCode::Char('t') if ctrl => return Some(Message::ToggleTree),
            KeyCode::Tab | KeyCode::BackTab if model.tree_visible => {
                return Some(Message::SwitchFocus);
            }
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            _ => {}
        }

        match model.focus {
            Focus::Tree if model.tree_visible => Self::handle_tree_key(key),
            _ => Self::handle_editor_key(key),
        }
    }

    fn handle_tree_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('k') | KeyCode::Up => Some(Message::TreeUp),
            KeyCode::Char('j') | KeyCode::Down => Some(Message::TreeDown),
            KeyCode::Enter => Some(Message::TreeActivate),
            KeyCode::Char('m') => Some(Message::TreeMark),
            KeyCode::Char('p') => Some(Message::TreeDrop),
            KeyCode::Esc => Some(Message::TreeClearMark),
            KeyCode::Char('?') => Some(Message::ToggleHelp),
            _ => None,
        }
    }

    fn handle_editor_key(key: KeyEvent) -> Option<Message> {
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Right if alt => Some(Message::EditorIndent),
            KeyCode::Left if alt => Some(Message::EditorOutdent),
            KeyCode::Left => Some(Message::EditorMoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::EditorMoveCursor(Direction::Right)),
            KeyCode::Up => Some(Message::EditorMoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::EditorMoveCursor(Direction::Down)),
            KeyCode::Home => Some(Message::EditorMoveHome),
            KeyCode::End => Some(Message::EditorMoveEnd),
            KeyCode::Enter => Some(Message::EditorSplitLine),
            KeyCode::Backspace => Some(Message::EditorDeleteBack),
            KeyCode::Delete => Some(Message::EditorDeleteForward),
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL) && !alt =>
            {
                Some(Message::EditorInsertChar(c))
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return None;
        }
        let (col, row) = (mouse.column, mouse.row);
        let panes = model.layout();
        let in_tree = panes
            .tree
            .is_some_and(|area| crate::ui::contains(area, col, row));
        let in_editor = crate::ui::contains(panes.editor, col, row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if in_tree => {
                crate::ui::tree_row_at(model, col, row).map(Message::TreeClick)
            }
            MouseEventKind::Down(MouseButton::Left) if in_editor => {
                crate::ui::editor_position_at(model, col, row)
                    .map(|(line, col)| Message::EditorMoveTo(line, col))
            }
            MouseEventKind::ScrollDown if in_tree => Some(Message::TreeScrollDown),
            MouseEventKind::ScrollUp if in_tree => Some(Message::TreeScrollUp),
            MouseEventKind::ScrollDown if in_editor => {
                Some(Message::EditorScrollDown(SCROLL_LINES))
            }
            MouseEventKind::ScrollUp if in_editor => Some(Message::EditorScrollUp(SCROLL_LINES)),
            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut ratatui::Frame) {
        crate::ui::render(model, frame);
    }
}
