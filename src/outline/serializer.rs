//! Tree to canonical outline text.
//!
//! Output is always the list dialect: two spaces per level, `- ` markers,
//! `\n` between lines and no trailing newline. Nothing but shape, labels and
//! child order influences the result.

use super::{NodeId, Tree};

const INDENT: &str = "  ";
const MARKER: &str = "- ";

/// Serialize the whole tree. A tree without a root yields `""`; a virtual
/// root is skipped and its children start at depth zero.
pub fn serialize(tree: &Tree) -> String {
    let _scope = crate::perf::scope("outline.serialize");
    tree.root()
        .map_or_else(String::new, |root| serialize_subtree(tree, root))
}

/// Serialize the subtree under `id` with `id` at depth zero. A virtual node
/// contributes only its children.
pub fn serialize_subtree(tree: &Tree, id: NodeId) -> String {
    let Some(node) = tree.get(id) else {
        return String::new();
    };
    let mut lines = Vec::new();
    if node.is_virtual() {
        for &child in node.children() {
            emit(tree, child, &mut lines);
        }
    } else {
        emit(tree, id, &mut lines);
    }
    lines.join("\n")
}

/// Pre-order walk from `start`, explicit stack so deep outlines cannot
/// exhaust the call stack.
fn emit(tree: &Tree, start: NodeId, lines: &mut Vec<String>) {
    let mut stack = vec![(start, 0usize)];
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        lines.push(format!("{}{MARKER}{}", INDENT.repeat(depth), node.label()));
        stack.extend(node.children().iter().rev().map(|&child| (child, depth + 1)));
    }
}
