//! Outline text editing.
//!
//! A rope-backed buffer with one cursor and outline-aware line commands
//! (marker continuation, indent, outdent). The buffer is the editor side of
//! the sync engine.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer};
