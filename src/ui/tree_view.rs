//! Tree pane: one row per node with connector guides.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{Focus, Model};
use crate::config::TreeStyle;
use crate::outline::{NodeId, Tree};

/// One visible tree row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub id: NodeId,
    /// Guide characters in front of the label
    pub prefix: String,
    pub label: String,
    /// Parsed font color hint
    pub color: Option<Color>,
}

struct Guides {
    branch: &'static str,
    last: &'static str,
    pipe: &'static str,
    blank: &'static str,
}

const UNICODE_GUIDES: Guides = Guides {
    branch: "├─ ",
    last: "└─ ",
    pipe: "│  ",
    blank: "   ",
};

const ASCII_GUIDES: Guides = Guides {
    branch: "|- ",
    last: "`- ",
    pipe: "|  ",
    blank: "   ",
};

const fn guides(style: TreeStyle) -> &'static Guides {
    match style {
        TreeStyle::Unicode => &UNICODE_GUIDES,
        TreeStyle::Ascii => &ASCII_GUIDES,
    }
}

/// Flatten `tree` into display rows in pre-order.
///
/// A virtual root has no row; its children are drawn as top-level rows.
pub fn flatten(tree: &Tree, style: TreeStyle) -> Vec<TreeRow> {
    let Some(root) = tree.root_node() else {
        return Vec::new();
    };
    let guides = guides(style);
    let top: Vec<NodeId> = if root.is_virtual() {
        root.children().to_vec()
    } else {
        vec![root.id()]
    };

    // (node, for each level below the top: whether that branch is the last child)
    let mut stack: Vec<(NodeId, Vec<bool>)> =
        top.into_iter().rev().map(|id| (id, Vec::new())).collect();
    let mut rows = Vec::new();

    while let Some((id, branches)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let mut prefix = String::new();
        if let Some((&is_last, ancestors)) = branches.split_last() {
            for &ancestor_last in ancestors {
                prefix.push_str(if ancestor_last {
                    guides.blank
                } else {
                    guides.pipe
                });
            }
            prefix.push_str(if is_last { guides.last } else { guides.branch });
        }
        rows.push(TreeRow {
            id,
            prefix,
            label: node.label().to_string(),
            color: node.font_color().and_then(|hint| hint.parse().ok()),
        });

        let children = node.children();
        for (i, &child) in children.iter().enumerate().rev() {
            let mut child_branches = branches.clone();
            child_branches.push(i + 1 == children.len());
            stack.push((child, child_branches));
        }
    }
    rows
}

/// Row index (into the model's tree order) under a mouse position.
pub fn tree_row_at(model: &Model, col: u16, row: u16) -> Option<usize> {
    let area = super::inner(model.layout().tree?);
    if !super::contains(area, col, row) {
        return None;
    }
    let start = model.tree_pane.effective_offset(usize::from(area.height));
    let index = start + usize::from(row - area.y);
    (index < model.tree_pane.order().len()).then_some(index)
}

pub(super) fn render_tree(model: &Model, frame: &mut Frame, area: Rect) {
    let rows = flatten(model.engine.tree(), model.tree_style);
    let visible = usize::from(area.height.saturating_sub(2));
    let start = model.tree_pane.effective_offset(visible);

    let guide_style = Style::default().fg(Color::DarkGray);
    let lines: Vec<Line> = rows
        .iter()
        .skip(start)
        .take(visible)
        .map(|row| {
            let mut label_style = row.color.map_or_else(Style::default, |c| Style::default().fg(c));
            if model.tree_pane.marked == Some(row.id) {
                label_style = label_style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            }
            if model.tree_pane.selected == Some(row.id) {
                label_style = label_style.reversed();
            }
            Line::from(vec![
                Span::styled(row.prefix.clone(), guide_style),
                Span::styled(row.label.clone(), label_style),
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!(" {} ", model.title()))
        .borders(Borders::ALL)
        .border_style(if model.focus == Focus::Tree {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::parse;

    fn drawn(text: &str, style: TreeStyle) -> Vec<String> {
        let parsed = parse(text);
        flatten(&parsed.tree, style)
            .into_iter()
            .map(|row| format!("{}{}", row.prefix, row.label))
            .collect()
    }

    #[test]
    fn test_unicode_guides() {
        let rows = drawn(
            "- Root\n  - A\n    - A1\n    - A2\n  - B\n    - B1",
            TreeStyle::Unicode,
        );
        assert_eq!(
            rows,
            [
                "Root",
                "├─ A",
                "│  ├─ A1",
                "│  └─ A2",
                "└─ B",
                "   └─ B1",
            ]
        );
    }

    #[test]
    fn test_ascii_guides() {
        let rows = drawn("# Root\n## A\n## B", TreeStyle::Ascii);
        assert_eq!(rows, ["Root", "|- A", "`- B"]);
    }

    #[test]
    fn test_virtual_root_has_no_row() {
        let rows = drawn("- One\n  - Sub\n- Two", TreeStyle::Unicode);
        assert_eq!(rows, ["One", "└─ Sub", "Two"]);
    }

    #[test]
    fn test_empty_tree_has_no_rows() {
        assert!(drawn("", TreeStyle::Unicode).is_empty());
    }

    #[test]
    fn test_color_hint_is_parsed() {
        let mut parsed = parse("- Root\n  - Child\n  - Other");
        let child = parsed.index.node_at_line(1).unwrap();
        let other = parsed.index.node_at_line(2).unwrap();
        parsed.tree.set_font_color(child, Some("#00FF00".to_string()));
        parsed.tree.set_font_color(other, Some("not a color".to_string()));

        let rows = flatten(&parsed.tree, TreeStyle::Unicode);
        assert_eq!(rows[1].color, Some(Color::Rgb(0, 255, 0)));
        assert_eq!(rows[2].color, None);
    }
}
