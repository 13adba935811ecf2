use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::{Focus, Model};

use super::{overlays, status, tree_view};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let _scope = crate::perf::scope("ui.render");
    let area = frame.area();
    let panes = super::layout(area, model.tree_visible, model.active_toast().is_some());

    render_editor(model, frame, panes.editor);
    if let Some(tree_area) = panes.tree {
        tree_view::render_tree(model, frame, tree_area);
    }
    if let Some(toast_area) = panes.toast {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, panes.status);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let buf = &model.editor;
    let total_lines = buf.line_count();
    let gutter_width = usize::from(line_number_width(total_lines));

    let visible_height = usize::from(area.height.saturating_sub(2));
    let start = model.editor_scroll_offset;
    let end = (start + visible_height).min(total_lines);
    let cursor = buf.cursor();
    let show_cursor = model.focus == Focus::Editor;

    let mut content: Vec<Line> = Vec::new();
    for line_idx in start..end {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let line_num = format!("{:>gutter_width$} ", line_idx + 1);
        let mut spans = vec![Span::styled(line_num, Style::default().fg(Color::DarkGray))];

        if show_cursor && line_idx == cursor.line {
            let col = cursor.col.min(line_text.len());
            let (before, rest) = line_text.split_at(col);
            let cursor_len = rest.chars().next().map_or(0, char::len_utf8);
            let (under, after) = rest.split_at(cursor_len);

            if !before.is_empty() {
                spans.push(Span::raw(before.to_string()));
            }
            spans.push(Span::styled(
                if under.is_empty() { " " } else { under }.to_string(),
                Style::default().bg(Color::White).fg(Color::Black),
            ));
            if !after.is_empty() {
                spans.push(Span::raw(after.to_string()));
            }
        } else {
            spans.push(Span::raw(line_text));
        }
        content.push(Line::from(spans));
    }

    let block = Block::default()
        .title(" Outline ")
        .borders(Borders::ALL)
        .border_style(if model.focus == Focus::Editor {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Buffer position (line, byte column) under a mouse position in the
/// editor pane.
pub fn editor_position_at(model: &Model, col: u16, row: u16) -> Option<(usize, usize)> {
    let area = super::inner(model.layout().editor);
    if !super::contains(area, col, row) {
        return None;
    }
    let line = model.editor_scroll_offset + usize::from(row - area.y);
    let line = line.min(model.editor.line_count().saturating_sub(1));
    let gutter = line_number_width(model.editor.line_count()) + 1;
    let target = usize::from((col - area.x).saturating_sub(gutter));

    let text = model.editor.line_at(line).unwrap_or_default();
    let mut width = 0;
    let byte_col = text
        .char_indices()
        .find(|&(_, ch)| {
            width += ch.width().unwrap_or(0);
            width > target
        })
        .map_or(text.len(), |(idx, _)| idx);
    Some((line, byte_col))
}

/// Digits needed for the largest line number.
pub const fn line_number_width(total_lines: usize) -> u16 {
    let mut width = 1;
    let mut rest = total_lines / 10;
    while rest > 0 {
        width += 1;
        rest /= 10;
    }
    width
}
