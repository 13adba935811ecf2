//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use effects::{read_outline, save_outline, with_default_extension};
pub use model::{DEFAULT_FILE_NAME, Focus, Model, ToastLevel, TreePane};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::config::TreeStyle;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: PathBuf,
    tree_visible: bool,
    tree_focus: bool,
    tree_style: TreeStyle,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application editing `file_path`.
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            tree_visible: true,
            tree_focus: false,
            tree_style: TreeStyle::default(),
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Set initial tree pane visibility.
    pub const fn with_tree_visible(mut self, visible: bool) -> Self {
        self.tree_visible = visible;
        self
    }

    /// Start with keyboard focus in the tree pane.
    pub const fn with_tree_focus(mut self, focus: bool) -> Self {
        self.tree_focus = focus;
        self
    }

    pub const fn with_tree_style(mut self, style: TreeStyle) -> Self {
        self.tree_style = style;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

#[cfg(test)]
mod tests;
