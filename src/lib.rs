// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions
)]

//! # Mindmark
//!
//! A terminal mind-map editor. The document is a Markdown outline (a nested
//! bullet list or a run of ATX headings) shown next to the tree it
//! describes. Typing in the editor rebuilds the tree; moving a node in the
//! tree rewrites the text.
//!
//! ## Architecture
//!
//! The interactive shell uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`outline`]: Outline parsing, serialization and the sync engine
//! - [`editor`]: Rope-backed text buffer with outline-aware editing
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`config`]: Persistent flag defaults
//! - [`perf`]: Timing scopes

pub mod app;
pub mod config;
pub mod editor;
pub mod outline;
pub mod perf;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::outline::{SyncEngine, Tree, parse, serialize};
}
