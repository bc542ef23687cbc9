//! Source lookups that fill in what yaml-rust2 does not report.
//!
//! yaml-rust2 gives one marker per event, numeric anchor ids and no comments.
//! The functions here recover anchor names, event extents and comment text
//! from the source around that marker.

use super::RawStyle;
use crate::source_text::SourceText;

/// Node properties (`&anchor`, `!tag`) written in front of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Properties {
    /// Index of the first property, or the node marker when there are none
    pub start: usize,

    /// Index just past the last property, or the node marker
    pub end: usize,
    pub anchor: Option<String>,
}

/// One `&anchor` or `!tag` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PropertyToken {
    pub start: usize,
    pub end: usize,

    /// Anchor name; `None` for a tag
    pub anchor: Option<String>,
}

/// Extent of a scalar token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScalarExtent {
    pub end: usize,

    /// Comment written on a block scalar's header line (`| # note`)
    pub header_comment: Option<String>,
}

/// A `#` comment found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Comment {
    pub line: usize,

    /// Nothing but indentation precedes the `#` on its line
    pub full_line: bool,
    pub text: String,
}

fn is_flow_indicator(ch: char) -> bool {
    matches!(ch, ',' | '[' | ']' | '{' | '}')
}

fn is_name_char(ch: char) -> bool {
    !ch.is_whitespace() && !is_flow_indicator(ch)
}

/// Property tokens written in front of `index`, in source order, never
/// crossing `floor`.
///
/// Properties of a mapping and of its first key can sit next to each other
/// (`&map\n&key a: 1`), so the caller decides how many belong to which node.
pub(crate) fn property_tokens(
    source: &SourceText,
    index: usize,
    floor: usize,
) -> Vec<PropertyToken> {
    let chars = source.chars();
    let mut tokens = Vec::new();
    if index <= floor || index > chars.len() {
        return tokens;
    }

    let mut pos = index;
    loop {
        let mut end = pos;
        while end > floor && chars[end - 1].is_whitespace() {
            end -= 1;
        }

        // Verbatim tags (`!<tag:yaml.org,2002:str>`) may contain flow indicators
        if end > floor && chars[end - 1] == '>' {
            let verbatim = (floor..end - 1)
                .rev()
                .find(|&i| chars[i] == '!' && chars[i + 1] == '<');
            if let Some(begin) = verbatim {
                tokens.push(PropertyToken {
                    start: begin,
                    end,
                    anchor: None,
                });
                pos = begin;
                continue;
            }
        }

        let mut begin = end;
        while begin > floor && is_name_char(chars[begin - 1]) {
            begin -= 1;
        }
        if begin == end {
            break;
        }

        let anchor = match chars[begin] {
            '&' => Some(source.slice(begin + 1, end)),
            '!' => None,
            _ => break,
        };
        tokens.push(PropertyToken {
            start: begin,
            end,
            anchor,
        });
        pos = begin;
    }
    tokens.reverse();
    tokens
}

/// Take the last `count` tokens as the properties of the node at `index`.
pub(crate) fn take_properties(
    tokens: &mut Vec<PropertyToken>,
    count: usize,
    index: usize,
) -> Properties {
    let own = tokens.split_off(tokens.len().saturating_sub(count));
    Properties {
        start: own.first().map_or(index, |t| t.start),
        end: own.last().map_or(index, |t| t.end),
        anchor: own.into_iter().find_map(|t| t.anchor),
    }
}

/// Properties of the node at `index`, which carries `count` of them.
pub(crate) fn node_properties(
    source: &SourceText,
    index: usize,
    floor: usize,
    count: usize,
) -> Properties {
    if count == 0 {
        return take_properties(&mut Vec::new(), 0, index);
    }
    let mut tokens = property_tokens(source, index, floor);
    take_properties(&mut tokens, count, index)
}

/// First index at or after `from` that is neither whitespace nor part of a
/// comment.
pub(crate) fn content_start(source: &SourceText, from: usize) -> usize {
    let chars = source.chars();
    let mut pos = from;
    while pos < chars.len() {
        let ch = chars[pos];
        if ch.is_whitespace() {
            pos += 1;
        } else if ch == '#' && (pos == 0 || chars[pos - 1].is_whitespace()) {
            pos = skip_line(chars, pos);
        } else {
            break;
        }
    }
    pos
}

/// Index of the `|` or `>` header of a block scalar, searching `[from, to)`.
///
/// yaml-rust2 marks a block scalar at its first content line; the header
/// sits somewhere between the previous event and that mark, possibly after
/// indicators, properties and a comment.
pub(crate) fn block_indicator(source: &SourceText, from: usize, to: usize) -> Option<usize> {
    let chars = source.chars();
    let to = to.min(source.len());
    let mut pos = from;
    while pos < to {
        let token_start = pos == 0 || chars[pos - 1].is_whitespace();
        match chars[pos] {
            '|' | '>' => return Some(pos),
            '#' if token_start => pos = skip_line(chars, pos),
            '&' | '!' if token_start => {
                while pos < to && !chars[pos].is_whitespace() {
                    pos += 1;
                }
            }
            _ => pos += 1,
        }
    }
    None
}

/// Index of the line break ending the line that contains `pos`, or the end
/// of input.
fn skip_line(chars: &[char], mut pos: usize) -> usize {
    while pos < chars.len() && chars[pos] != '\n' {
        pos += 1;
    }
    pos
}

/// Read an alias name from the `*name` token at `index`.
///
/// Returns the name and the index just past it.
pub(crate) fn alias_name(source: &SourceText, index: usize) -> Option<(String, usize)> {
    if source.char_at(index) != Some('*') {
        return None;
    }
    let mut end = index + 1;
    while source.char_at(end).is_some_and(is_name_char) {
        end += 1;
    }
    Some((source.slice(index + 1, end), end))
}

/// Find where the scalar starting at `index` ends.
pub(crate) fn scalar_extent(
    source: &SourceText,
    index: usize,
    style: RawStyle,
    value: &str,
) -> ScalarExtent {
    match style {
        RawStyle::SingleQuoted => ScalarExtent {
            end: quoted_end(source, index, '\'').unwrap_or(index),
            header_comment: None,
        },
        RawStyle::DoubleQuoted => ScalarExtent {
            end: quoted_end(source, index, '"').unwrap_or(index),
            header_comment: None,
        },
        RawStyle::Literal | RawStyle::Folded => block_extent(source, index, value),
        _ => ScalarExtent {
            end: match_content(source, index, value).unwrap_or(index),
            header_comment: None,
        },
    }
}

/// Index just past the closing quote of a quoted scalar opening at `index`.
fn quoted_end(source: &SourceText, index: usize, quote: char) -> Option<usize> {
    if source.char_at(index) != Some(quote) {
        return None;
    }
    let mut pos = index + 1;
    while let Some(ch) = source.char_at(pos) {
        if quote == '"' && ch == '\\' {
            pos += 2;
            continue;
        }
        if ch == quote {
            // '' is an escaped quote inside a single-quoted scalar
            if quote == '\'' && source.char_at(pos + 1) == Some('\'') {
                pos += 2;
                continue;
            }
            return Some(pos + 1);
        }
        pos += 1;
    }
    None
}

/// Match the non-whitespace characters of `value`, in order, against the
/// source starting at `from`, allowing only whitespace between them.
///
/// Plain and block scalars differ from their source only in whitespace, so
/// this finds the index just past the last content character. Returns `None`
/// if nothing matched.
fn match_content(source: &SourceText, from: usize, value: &str) -> Option<usize> {
    let mut pos = from;
    let mut last = None;
    for expected in value.chars().filter(|c| !c.is_whitespace()) {
        while source.char_at(pos).is_some_and(char::is_whitespace) {
            pos += 1;
        }
        if source.char_at(pos) != Some(expected) {
            break;
        }
        pos += 1;
        last = Some(pos);
    }
    last
}

fn block_extent(source: &SourceText, index: usize, value: &str) -> ScalarExtent {
    let body = source.next_line_start(index);
    let header_comment = comments_between(source, index, body)
        .into_iter()
        .next()
        .map(|c| c.text);
    let end = match match_content(source, body, value) {
        Some(last) => source.next_line_start(last - 1),
        None => body,
    };
    ScalarExtent {
        end,
        header_comment,
    }
}

/// Comments that start in `[from, to)`.
///
/// Only the range between tokens should be passed in; inside scalars a `#`
/// is content.
pub(crate) fn comments_between(source: &SourceText, from: usize, to: usize) -> Vec<Comment> {
    let chars = source.chars();
    let to = to.min(chars.len());
    let mut comments = Vec::new();
    let mut pos = from;
    while pos < to {
        let ch = chars[pos];
        let starts_comment = ch == '#' && (pos == 0 || chars[pos - 1].is_whitespace());
        if !starts_comment {
            pos += 1;
            continue;
        }

        let eol = skip_line(chars, pos);
        let line = source.line_of(pos);
        let mut line_start = pos;
        while line_start > 0 && chars[line_start - 1] != '\n' {
            line_start -= 1;
        }
        let full_line = chars[line_start..pos].iter().all(|c| c.is_whitespace());
        comments.push(Comment {
            line,
            full_line,
            text: comment_text(&source.slice(pos + 1, eol)),
        });
        pos = eol;
    }
    comments
}

/// Strip the space after `#` and any trailing whitespace.
fn comment_text(raw: &str) -> String {
    raw.strip_prefix(' ').unwrap_or(raw).trim_end().to_string()
}
