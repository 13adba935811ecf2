use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

const KEYS: &[(&str, &[(&str, &str)])] = &[
    (
        "Editor",
        &[
            ("Arrows, Home/End", "Move cursor"),
            ("Enter", "New line, continues the list item"),
            ("Alt+Right / Alt+Left", "Indent / outdent line"),
        ],
    ),
    (
        "Tree",
        &[
            ("j/k or Up/Down", "Select node"),
            ("Enter, click", "Jump to node in the text"),
            ("m", "Mark node for moving"),
            ("p", "Move marked node under selection"),
            ("Esc", "Clear mark"),
        ],
    ),
    (
        "General",
        &[
            ("Tab", "Switch focus"),
            ("Ctrl+T", "Toggle tree pane"),
            ("Ctrl+S", "Save"),
            ("Ctrl+N", "New document"),
            ("Ctrl+Q", "Quit"),
            ("? / F1", "Toggle help"),
        ],
    ),
];

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    for (section, keys) in KEYS {
        lines.push(Line::styled(*section, section_style));
        for (key, action) in *keys {
            lines.push(Line::raw(format!("  {key:<22}{action}")));
        }
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled("Config", section_style));
    lines.push(Line::raw(format!("  Global: {global_cfg}")));
    lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
