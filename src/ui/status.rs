use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Focus, Model, ToastLevel};
use crate::outline::Dialect;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let modified = if model.is_dirty() { " [modified]" } else { "" };
    let cursor = model.editor.cursor();
    let nodes = model.tree_pane.order().len();
    let dialect = match model.engine.dialect() {
        Some(Dialect::List) => "list",
        Some(Dialect::Heading) => "headings",
        None => "empty",
    };
    let focus = match model.focus {
        Focus::Editor => "EDIT",
        Focus::Tree => "TREE",
    };
    let mark = if model.tree_pane.marked.is_some() {
        "  [moving]"
    } else {
        ""
    };

    let status = format!(
        " {focus}  {}{modified}  Ln {}, Col {}  {nodes} nodes ({dialect}){mark}  ?:help",
        model.file_name(),
        cursor.line + 1,
        cursor.col + 1,
    );
    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
