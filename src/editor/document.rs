use ropey::Rope;
use serde::{Deserialize, Serialize};

use crate::syntax::Span;

/// Zero-based line and character (Unicode scalar) column
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn empty(position: Position) -> Self {
        Self::new(position, position)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// Ranges overlap unless one ends strictly before the other begins, so ranges that only
    /// touch at a boundary overlap
    pub fn overlaps(&self, other: &Range) -> bool {
        !(self.end < other.start || other.end < self.start)
    }
}

/// A selection keeps its anchor; the active end is where the cursor sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub fn cursor(position: Position) -> Self {
        Self {
            anchor: position,
            active: position,
        }
    }

    pub fn from_range(range: Range) -> Self {
        Self {
            anchor: range.start,
            active: range.end,
        }
    }

    pub fn range(&self) -> Range {
        Range::new(self.anchor, self.active)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// Whether this selection picks out `range`: a bare cursor must sit inside it, a real
    /// selection must share at least one character with it
    pub fn touches(&self, range: Range) -> bool {
        if self.is_empty() {
            range.contains(self.active)
        } else {
            let own = self.range();
            own.start < range.end && range.start < own.end
        }
    }
}

/// Immutable snapshot of a document's text.
///
/// Offsets are UTF-8 byte offsets, matching tree-sitter; positions count characters within a
/// line.
#[derive(Debug, Clone, fieldwork::Fieldwork)]
#[fieldwork(get)]
pub struct TextDocument {
    file_name: String,
    language_id: String,
    #[fieldwork(get(copy))]
    version: u64,
    #[fieldwork(skip)]
    rope: Rope,
}

impl TextDocument {
    pub fn new(
        file_name: impl Into<String>,
        language_id: impl Into<String>,
        text: &str,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            language_id: language_id.into(),
            version: 0,
            rope: Rope::from_str(text),
        }
    }

    pub(crate) fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Next version of this document holding `rope`
    pub(crate) fn revise(&self, rope: Rope) -> Self {
        Self {
            file_name: self.file_name.clone(),
            language_id: self.language_id.clone(),
            version: self.version + 1,
            rope,
        }
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Character length of `line`, excluding its line terminator
    fn line_len(&self, line: usize) -> usize {
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        while len > 0 && matches!(slice.char(len - 1), '\n' | '\r') {
            len -= 1;
        }
        len
    }

    /// Byte offset of `position`, clamped into the document
    pub fn offset_at(&self, position: Position) -> usize {
        let last_line = self.rope.len_lines().saturating_sub(1);
        let line = position.line.min(last_line);
        let character = position.character.min(self.line_len(line));
        self.rope
            .char_to_byte(self.rope.line_to_char(line) + character)
    }

    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_bytes());
        let char_index = self.rope.byte_to_char(offset);
        let line = self.rope.char_to_line(char_index);
        Position::new(line, char_index - self.rope.line_to_char(line))
    }

    pub fn range_of(&self, span: Span) -> Range {
        Range::new(self.position_at(span.start), self.position_at(span.end))
    }

    pub fn span_of(&self, range: Range) -> Span {
        Span::new(self.offset_at(range.start), self.offset_at(range.end))
    }

    pub fn slice(&self, span: Span) -> String {
        let end = span.end.min(self.rope.len_bytes());
        let start = span.start.min(end);
        self.rope.byte_slice(start..end).to_string()
    }

    pub fn text_in(&self, range: Range) -> String {
        self.slice(self.span_of(range))
    }

    /// The identifier-like word touching `position`, including one the cursor sits right after
    pub fn word_at(&self, position: Position) -> Option<(Range, String)> {
        let last_line = self.rope.len_lines().saturating_sub(1);
        if position.line > last_line {
            return None;
        }

        let chars = self
            .rope
            .line(position.line)
            .chars()
            .take(self.line_len(position.line))
            .collect::<Vec<_>>();
        let cursor = position.character.min(chars.len());

        let mut start = cursor;
        while start > 0 && is_word_char(chars[start - 1]) {
            start -= 1;
        }
        let mut end = cursor;
        while end < chars.len() && is_word_char(chars[end]) {
            end += 1;
        }

        (start < end).then(|| {
            (
                Range::new(
                    Position::new(position.line, start),
                    Position::new(position.line, end),
                ),
                chars[start..end].iter().collect(),
            )
        })
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(text: &str) -> TextDocument {
        TextDocument::new("test.ts", "typescript", text)
    }

    #[test]
    fn offsets_and_positions_round_trip_over_multibyte_text() {
        let doc = document("const é = 1;\nlet b = 2;\n");
        let position = Position::new(0, 8);
        let offset = doc.offset_at(position);
        assert_eq!(offset, 9);
        assert_eq!(doc.position_at(offset), position);
        assert_eq!(doc.position_at(doc.offset_at(Position::new(1, 4))), Position::new(1, 4));
    }

    #[test]
    fn offset_clamps_past_line_end_and_document_end() {
        let doc = document("ab\ncd");
        assert_eq!(doc.offset_at(Position::new(0, 40)), 2);
        assert_eq!(doc.offset_at(Position::new(9, 0)), 3);
        assert_eq!(doc.position_at(500), Position::new(1, 2));
    }

    #[test]
    fn word_at_cursor_inside_and_after_word() {
        let doc = document("  private userCache = new Map();");
        let (range, word) = doc.word_at(Position::new(0, 12)).unwrap();
        assert_eq!(word, "userCache");
        assert_eq!(range.start, Position::new(0, 10));
        assert_eq!(doc.word_at(Position::new(0, 19)).unwrap().1, "userCache");
        assert_eq!(doc.word_at(Position::new(0, 1)), None);
    }

    #[test]
    fn touching_ranges_overlap() {
        let a = Range::new(Position::new(0, 0), Position::new(0, 5));
        let b = Range::new(Position::new(0, 5), Position::new(0, 9));
        let c = Range::new(Position::new(0, 6), Position::new(0, 9));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn cursor_touches_containing_range_only() {
        let range = Range::new(Position::new(1, 2), Position::new(1, 8));
        assert!(Selection::cursor(Position::new(1, 4)).touches(range));
        assert!(!Selection::cursor(Position::new(2, 0)).touches(range));
        let selection = Selection::from_range(Range::new(Position::new(0, 0), Position::new(1, 2)));
        assert!(!selection.touches(range));
    }
}
