//! Outline text to tree.
//!
//! Two dialects are recognised: indented `-`/`*` list items and ATX headings.
//! List syntax wins whenever at least one list line exists; headings are only
//! considered for text without any list line. Everything else is body text
//! and never becomes a node.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::{LineIndex, NodeId, Tree};

static LIST_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[-*]\s+(.+)$").expect("list pattern is valid"));
static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("heading pattern is valid"));

/// Columns a tab counts for when measuring list indentation.
const TAB_WIDTH: usize = 2;
/// Columns per list nesting level.
const INDENT_UNIT: usize = 2;

/// Which markup the outline was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `-` or `*` items, nesting by leading whitespace.
    List,
    /// `#` through `######` headings, nesting by level.
    Heading,
}

impl Dialect {
    fn pattern(self) -> &'static Regex {
        match self {
            Self::List => &LIST_LINE,
            Self::Heading => &HEADING_LINE,
        }
    }

    /// Depth and trimmed label of a line in this dialect.
    fn match_line(self, line: &str) -> Option<(i64, &str)> {
        let caps = self.pattern().captures(line)?;
        let label = caps.get(2)?.as_str().trim();
        if label.is_empty() {
            return None;
        }
        let marker = caps.get(1)?.as_str();
        let depth = match self {
            Self::List => indent_width(marker) / INDENT_UNIT,
            Self::Heading => marker.len(),
        };
        Some((i64::try_from(depth).unwrap_or(i64::MAX), label))
    }

    /// Level-stack key of a synthesized virtual root. Heading levels start at
    /// one, so zero is free; list depths start at zero and need `-1`.
    const fn sentinel(self) -> i64 {
        match self {
            Self::List => -1,
            Self::Heading => 0,
        }
    }

    /// Depth of an entry re-based under a virtual root.
    const fn rebase(self, depth: i64, min_level: i64) -> i64 {
        match self {
            Self::List => depth - min_level,
            Self::Heading => depth - min_level + 1,
        }
    }
}

fn indent_width(whitespace: &str) -> usize {
    whitespace
        .chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

/// One recognised line, alive only while the tree is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedLine {
    depth: i64,
    label: String,
    line: usize,
}

/// Result of parsing one text snapshot.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub tree: Tree,
    pub index: LineIndex,
    /// `None` when no line was recognised.
    pub dialect: Option<Dialect>,
}

impl Parsed {
    fn empty() -> Self {
        Self {
            tree: Tree::new(),
            index: LineIndex::new(),
            dialect: None,
        }
    }

    pub const fn root(&self) -> Option<NodeId> {
        self.tree.root()
    }
}

/// Parse outline text into a tree and its line index.
///
/// Total over all input: blank text, text without any outline line, level
/// skips and mixed markers all produce a result rather than an error.
pub fn parse(text: &str) -> Parsed {
    let _scope = crate::perf::scope("outline.parse");
    if text.trim().is_empty() {
        return Parsed::empty();
    }

    let Some((dialect, entries)) = [Dialect::List, Dialect::Heading]
        .into_iter()
        .map(|dialect| (dialect, extract(text, dialect)))
        .find(|(_, entries)| !entries.is_empty())
    else {
        debug!("no outline lines found");
        return Parsed::empty();
    };

    let (tree, index) = assemble(entries, dialect);
    debug!(?dialect, nodes = tree.len(), indexed = index.len(), "parsed outline");
    Parsed {
        tree,
        index,
        dialect: Some(dialect),
    }
}

fn extract(text: &str, dialect: Dialect) -> Vec<ParsedLine> {
    text.split('\n')
        .enumerate()
        .filter_map(|(line, raw)| {
            dialect.match_line(raw).map(|(depth, label)| ParsedLine {
                depth,
                label: label.to_string(),
                line,
            })
        })
        .collect()
}

/// Build the tree with a level stack: each entry hangs under the most
/// recent entry at the greatest level strictly below its own.
fn assemble(mut entries: Vec<ParsedLine>, dialect: Dialect) -> (Tree, LineIndex) {
    let mut tree = Tree::new();
    let mut index = LineIndex::new();
    let Some(min_level) = entries.iter().map(|e| e.depth).min() else {
        return (tree, index);
    };

    let mut stack: BTreeMap<i64, NodeId> = BTreeMap::new();
    let roots = entries.iter().filter(|e| e.depth == min_level).count();
    let root = if roots > 1 {
        let root = tree.create_virtual_root();
        stack.insert(dialect.sentinel(), root);
        for entry in &mut entries {
            entry.depth = dialect.rebase(entry.depth, min_level);
        }
        root
    } else {
        let pos = entries
            .iter()
            .position(|e| e.depth == min_level)
            .unwrap_or_default();
        let first = entries.remove(pos);
        let root = tree.create_node(first.label);
        index.record(first.line, root);
        stack.insert(min_level, root);
        root
    };
    tree.install_root(root);

    for entry in entries {
        let node = tree.create_node(entry.label);
        let parent = stack
            .range(..entry.depth)
            .next_back()
            .map_or(root, |(_, &id)| id);
        tree.push_child(parent, node);
        stack.retain(|&level, _| level < entry.depth);
        stack.insert(entry.depth, node);
        index.record(entry.line, node);
    }

    (tree, index)
}
