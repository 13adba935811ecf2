//! Outline model: text dialects, the node tree, and the engine keeping
//! the two in step.
//!
//! Text is the source of truth. [`parse`] turns it into a [`Tree`] plus a
//! [`LineIndex`]; [`serialize`] turns a tree back into canonical list text.
//! [`SyncEngine`] drives both directions for an editor and a tree view.

mod error;
mod index;
mod node;
mod parser;
mod serializer;
mod sync;
mod tree;

pub use error::{InvalidReparentError, SyncError};
pub use index::LineIndex;
pub use node::{Node, NodeId, VIRTUAL_ROOT_LABEL};
pub use parser::{Dialect, Parsed, parse};
pub use serializer::{serialize, serialize_subtree};
pub use sync::{SyncEngine, SyncState, SyncStep, TextOutcome, TextPort, TreePort};
pub use tree::{DEFAULT_TITLE, Shape, Tree};
