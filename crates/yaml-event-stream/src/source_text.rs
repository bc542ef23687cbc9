//! Char-indexed view of the input document.
//!
//! yaml-rust2 reports positions as character indices into the input. This
//! module keeps the decoded characters together with an index of line starts
//! so that an engine index can be turned into a `(line, column)` pair, and
//! offers the handful of lookups the engine binding needs when it recovers
//! information the parser does not report (anchor names, comment text,
//! scalar extents).

use crate::event::Position;

/// Decoded input plus a line-start index.
#[derive(Debug, Clone)]
pub(crate) struct SourceText {
    chars: Vec<char>,

    /// Char index of the first character of every line (line 0 starts at 0)
    line_starts: Vec<usize>,
}

impl SourceText {
    /// Analyze `content` once, recording where each line begins.
    pub(crate) fn new(content: &str) -> Self {
        let chars: Vec<char> = content.chars().collect();
        let mut line_starts = vec![0];
        line_starts.extend(
            chars
                .iter()
                .enumerate()
                .filter_map(|(idx, ch)| (*ch == '\n').then_some(idx + 1)),
        );

        SourceText { chars, line_starts }
    }

    /// Number of characters in the document.
    pub(crate) fn len(&self) -> usize {
        self.chars.len()
    }

    /// Character at `index`, if any.
    pub(crate) fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    /// All characters, in order.
    pub(crate) fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Collect the characters in `[start, end)` into a `String`.
    ///
    /// Out-of-range bounds are clamped to the document.
    pub(crate) fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// 0-based line containing `index`.
    ///
    /// A newline character belongs to the line it terminates. Indices past
    /// the end resolve to the last line.
    pub(crate) fn line_of(&self, index: usize) -> usize {
        let index = index.min(self.chars.len());
        match self.line_starts.binary_search(&index) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    /// Convert an engine index to a [`Position`].
    pub(crate) fn position(&self, index: usize) -> Position {
        let offset = index.min(self.chars.len());
        let line = self.line_of(offset);
        Position {
            offset,
            line,
            column: offset - self.line_starts[line],
        }
    }

    /// Index just past the end of the line containing `index`, including its
    /// line break.
    pub(crate) fn next_line_start(&self, index: usize) -> usize {
        let line = self.line_of(index);
        self.line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.chars.len())
    }

    /// Whether `index` is the first column of a line.
    pub(crate) fn at_line_start(&self, index: usize) -> bool {
        index == 0 || self.char_at(index - 1) == Some('\n')
    }

    /// Whether `marker` (e.g. `---`) sits at `index` as a standalone
    /// document marker: first column, followed by whitespace or the end of
    /// input.
    pub(crate) fn has_document_marker(&self, index: usize, marker: &str) -> bool {
        if !self.at_line_start(index) {
            return false;
        }
        let width = marker.chars().count();
        let matches = marker
            .chars()
            .enumerate()
            .all(|(i, ch)| self.char_at(index + i) == Some(ch));
        matches
            && self
                .char_at(index + width)
                .is_none_or(char::is_whitespace)
    }
}
