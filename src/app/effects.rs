use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::app::{App, Message, Model, ToastLevel};

impl App {
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        if matches!(msg, Message::Save) {
            Self::save(model);
        }
    }

    fn save(model: &mut Model) {
        match save_outline(&model.file_path, &model.editor.text()) {
            Ok(path) => {
                model.editor.mark_clean();
                model.show_toast(ToastLevel::Info, format!("Saved {}", path.display()));
                model.file_path = path;
            }
            Err(err) => {
                model.show_toast(ToastLevel::Error, format!("Save failed: {err:#}"));
            }
        }
    }
}

/// Read an outline file. A path that does not exist yet is an empty
/// document that will be created on the first save.
pub fn read_outline(path: &Path) -> Result<String> {
    if !path.exists() {
        info!(path = %path.display(), "starting new document");
        return Ok(String::new());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write `text` to `path`, adding `.md` when the path has no extension.
/// Returns the path actually written.
pub fn save_outline(path: &Path, text: &str) -> Result<PathBuf> {
    let path = with_default_extension(path);
    fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = text.len(), "saved document");
    Ok(path)
}

pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("md")
    }
}
