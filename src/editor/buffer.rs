use ropey::Rope;

use crate::outline::TextPort;

/// Spaces added or removed per outline level.
const INDENT: &str = "  ";
const MAX_HEADING_LEVEL: usize = 6;

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
    /// Sticky column for vertical movement.
    col_memory: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Rope-backed outline text with a single cursor.
///
/// Every edit queues a change notification, collected with
/// [`take_change`](Self::take_change). Programmatic writes through
/// [`TextPort::replace_text`] queue one too and hand it back immediately,
/// the way a widget's change signal fires for both.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    dirty: bool,
    changed: bool,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::default(),
            dirty: false,
            changed: false,
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Modified since load or the last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Replace everything and start clean, as when a file is opened.
    pub fn reset(&mut self, text: &str) {
        *self = Self::from_text(text);
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Content of a line without its line ending.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Length of a line in bytes, without its line ending.
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// The current text if anything changed since the last call.
    pub fn take_change(&mut self) -> Option<String> {
        std::mem::take(&mut self.changed).then(|| self.text())
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.split_line();
            return;
        }
        let mut utf8 = [0; 4];
        self.insert_at(self.cursor.line, self.cursor.col, ch.encode_utf8(&mut utf8));
        self.cursor.set_col(self.cursor.col + ch.len_utf8());
    }

    pub fn insert_str(&mut self, s: &str) {
        for (i, part) in s.split('\n').enumerate() {
            if i > 0 {
                self.insert_at(self.cursor.line, self.cursor.col, "\n");
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            if !part.is_empty() {
                self.insert_at(self.cursor.line, self.cursor.col, part);
                self.cursor.set_col(self.cursor.col + part.len());
            }
        }
    }

    /// Enter. On a list item the new line continues the item's indentation
    /// and marker; Enter on an item with no text ends the list instead.
    pub fn split_line(&mut self) {
        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let prefix = list_prefix(&line).filter(|p| self.cursor.col >= p.len());

        match prefix {
            Some(prefix) if line[prefix.len()..].trim().is_empty() => {
                let len = line.len();
                self.remove_at(self.cursor.line, 0, len);
                self.cursor.set_col(0);
            }
            Some(prefix) => {
                let continuation = format!("\n{prefix}");
                let col = prefix.len();
                self.insert_at(self.cursor.line, self.cursor.col, &continuation);
                self.cursor.line += 1;
                self.cursor.set_col(col);
            }
            None => {
                self.insert_at(self.cursor.line, self.cursor.col, "\n");
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
        }
    }

    /// Backspace. Returns `true` if anything was removed.
    pub fn delete_back(&mut self) -> bool {
        let Cursor { line, col, .. } = self.cursor;
        if col == 0 {
            if line == 0 {
                return false;
            }
            let prev_len = self.line_len(line - 1);
            self.join_with_next(line - 1);
            self.cursor.line -= 1;
            self.cursor.set_col(prev_len);
            return true;
        }
        let text = self.line_at(line).unwrap_or_default();
        let width = text[..col].chars().next_back().map_or(1, char::len_utf8);
        self.remove_at(line, col - width, width);
        self.cursor.set_col(col - width);
        true
    }

    /// Delete. Returns `true` if anything was removed.
    pub fn delete_forward(&mut self) -> bool {
        let Cursor { line, col, .. } = self.cursor;
        let text = self.line_at(line).unwrap_or_default();
        if col >= text.len() {
            if line + 1 >= self.line_count() {
                return false;
            }
            self.join_with_next(line);
            return true;
        }
        let width = text[col..].chars().next().map_or(1, char::len_utf8);
        self.remove_at(line, col, width);
        true
    }

    /// Push the current line one level deeper: another `#` on a heading,
    /// two more spaces on anything else.
    pub fn indent_line(&mut self) -> bool {
        let line = self.cursor.line;
        let text = self.line_at(line).unwrap_or_default();
        match heading_level(&text) {
            Some((_, level)) if level >= MAX_HEADING_LEVEL => false,
            Some((start, _)) => {
                self.insert_at(line, start, "#");
                self.shift_cursor(start, 1);
                true
            }
            None => {
                self.insert_at(line, 0, INDENT);
                self.cursor.set_col(self.cursor.col + INDENT.len());
                true
            }
        }
    }

    /// Pull the current line one level up. Returns `false` when it is
    /// already at the top level.
    pub fn outdent_line(&mut self) -> bool {
        let line = self.cursor.line;
        let text = self.line_at(line).unwrap_or_default();
        let removed = match heading_level(&text) {
            Some((_, 1)) => return false,
            Some((start, _)) => {
                self.remove_at(line, start, 1);
                self.shift_cursor(start, -1);
                return true;
            }
            None if text.starts_with(INDENT) => INDENT.len(),
            None if text.starts_with([' ', '\t']) => 1,
            None => return false,
        };
        self.remove_at(line, 0, removed);
        self.cursor.set_col(self.cursor.col.saturating_sub(removed));
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_vertical(-1),
            Direction::Down => self.move_vertical(1),
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    pub fn move_end(&mut self) {
        self.cursor.set_col(self.line_len(self.cursor.line));
    }

    /// Move to `line`/`col`, clamped to the text.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.cursor.line = line.min(self.line_count().saturating_sub(1));
        let col = self.snap_col(self.cursor.line, col);
        self.cursor.set_col(col);
    }

    fn move_left(&mut self) {
        let Cursor { line, col, .. } = self.cursor;
        if col > 0 {
            let text = self.line_at(line).unwrap_or_default();
            let width = text[..col].chars().next_back().map_or(1, char::len_utf8);
            self.cursor.set_col(col - width);
        } else if line > 0 {
            self.cursor.line -= 1;
            self.move_end();
        }
    }

    fn move_right(&mut self) {
        let Cursor { line, col, .. } = self.cursor;
        let text = self.line_at(line).unwrap_or_default();
        if let Some(next) = text[col..].chars().next() {
            self.cursor.set_col(col + next.len_utf8());
        } else if line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let Some(target) = self.cursor.line.checked_add_signed(delta) else {
            return;
        };
        if target >= self.line_count() {
            return;
        }
        self.cursor.line = target;
        self.cursor.col = self.snap_col(target, self.cursor.col_memory);
    }

    /// Clamp `col` to the line and back onto a char boundary.
    fn snap_col(&self, line: usize, col: usize) -> usize {
        let text = self.line_at(line).unwrap_or_default();
        let mut col = col.min(text.len());
        while !text.is_char_boundary(col) {
            col -= 1;
        }
        col
    }

    fn shift_cursor(&mut self, at: usize, delta: isize) {
        if self.cursor.col >= at {
            let col = self.cursor.col.saturating_add_signed(delta);
            self.cursor.set_col(col);
        }
    }

    fn char_idx(&self, line: usize, col: usize) -> usize {
        self.rope.byte_to_char(self.rope.line_to_byte(line) + col)
    }

    fn insert_at(&mut self, line: usize, col: usize, s: &str) {
        let idx = self.char_idx(line, col);
        self.rope.insert(idx, s);
        self.touch();
    }

    fn remove_at(&mut self, line: usize, col: usize, len: usize) {
        let start = self.char_idx(line, col);
        let end = self.rope.byte_to_char(self.rope.line_to_byte(line) + col + len);
        self.rope.remove(start..end);
        self.touch();
    }

    /// Remove the line ending after `line`, whether `\n` or `\r\n`.
    fn join_with_next(&mut self, line: usize) {
        let start = self.char_idx(line, self.line_len(line));
        let end = self.rope.line_to_char(line + 1);
        self.rope.remove(start..end);
        self.touch();
    }

    const fn touch(&mut self) {
        self.dirty = true;
        self.changed = true;
    }
}

impl TextPort for EditorBuffer {
    fn replace_text(&mut self, text: &str) -> Option<String> {
        if self.rope != text {
            self.rope = Rope::from_str(text);
            self.touch();
            let Cursor { line, col, .. } = self.cursor;
            self.move_to(line, col);
        }
        self.take_change()
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("rope", &format_args!("Rope({} lines)", self.rope.len_lines()))
            .field("cursor", &self.cursor)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

/// Indentation, marker and separating whitespace of a list item line.
fn list_prefix(line: &str) -> Option<&str> {
    let body = line.trim_start_matches([' ', '\t']);
    let indent = line.len() - body.len();
    let after_marker = body.strip_prefix(['-', '*'])?;
    let gap = after_marker.len() - after_marker.trim_start_matches([' ', '\t']).len();
    (gap > 0).then(|| &line[..indent + 1 + gap])
}

/// Byte offset of the first `#` and the heading level, for ATX headings.
fn heading_level(line: &str) -> Option<(usize, usize)> {
    let body = line.trim_start();
    let start = line.len() - body.len();
    let level = body.bytes().take_while(|&b| b == b'#').count();
    let rest = &body[level..];
    ((1..=MAX_HEADING_LEVEL).contains(&level) && rest.starts_with([' ', '\t']))
        .then_some((start, level))
}
