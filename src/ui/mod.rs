//! Terminal UI components.
//!
//! - [`render`]: frame layout and the editor pane
//! - [`tree_view`]: tree rows with guides, selection and mark styling
//! - status and toast bars, help overlay

pub mod tree_view;

mod overlays;
mod render;
mod status;

pub use render::{editor_position_at, line_number_width, render};
pub use tree_view::{TreeRow, flatten, tree_row_at};

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const EDITOR_WIDTH_PERCENT: u16 = 40;
pub const TREE_WIDTH_PERCENT: u16 = 60;

/// Screen areas for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneLayout {
    pub editor: Rect,
    pub tree: Option<Rect>,
    pub toast: Option<Rect>,
    pub status: Rect,
}

pub fn split_main_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(EDITOR_WIDTH_PERCENT),
            Constraint::Percentage(TREE_WIDTH_PERCENT),
        ])
        .split(area)
}

/// Editor and tree side by side above a toast row (when one is showing)
/// and the status row.
pub fn layout(area: Rect, tree_visible: bool, toast_active: bool) -> PaneLayout {
    let footer_rows = 1 + u16::from(toast_active);
    let panes = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };
    let status = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };
    let toast = toast_active.then(|| Rect {
        y: area.y + area.height.saturating_sub(2),
        height: area.height.saturating_sub(1).min(1),
        ..area
    });

    let (editor, tree) = if tree_visible {
        let columns = split_main_columns(panes);
        (columns[0], Some(columns[1]))
    } else {
        (panes, None)
    };

    PaneLayout {
        editor,
        tree,
        toast,
        status,
    }
}

/// Area inside a pane's border.
pub const fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

pub(crate) const fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x && col < area.x + area.width && row >= area.y && row < area.y + area.height
}
