//! [`Engine`] implementation backed by yaml-rust2.

use super::annotate::{self, Comment, Properties};
use super::{Engine, EngineError, Mark, RawEvent, RawEventKind, RawStyle};
use crate::source_text::SourceText;
use crate::{Error, Result};
use std::collections::{HashMap, VecDeque};
use std::io::Read;
use yaml_rust2::parser::{Event, Parser, Tag};
use yaml_rust2::scanner::{ScanError, TScalarStyle};

/// A collection that has started but not yet ended.
#[derive(Debug, Clone, Copy)]
struct OpenCollection {
    style: RawStyle,

    /// Opened with `[` or `{` (an implicit single-pair mapping inside a flow
    /// sequence is flow but has no bracket)
    bracketed: bool,
}

/// A mapping start whose position is not known yet.
///
/// yaml-rust2 marks a mapping without braces at the `:` after its first key,
/// so it is placed once that key has been seen.
#[derive(Debug)]
struct UnplacedMapping {
    raw: RawEvent,
    anchor_id: usize,
    has_tag: bool,

    /// Index yaml-rust2 reported for the mapping
    marker: usize,
}

/// YAML engine over yaml-rust2's event parser.
///
/// yaml-rust2 reports a single marker per event, anchors as numeric ids and
/// no comments. This engine fills in the rest of a [`RawEvent`] from the
/// source text: extents, anchor names, collection styles, implicit flags and
/// attached comments.
///
/// A comment on the same line as an event can only be attached once the next
/// event is known, so the newest event always stays queued until another one
/// follows it.
pub struct YamlEngine {
    parser: Parser<std::vec::IntoIter<char>>,
    source: SourceText,

    /// End index of the most recently completed event
    cursor: usize,
    collections: Vec<OpenCollection>,
    anchors: HashMap<usize, String>,

    /// Full-line comments waiting for the next node or end event
    pending_comments: Vec<String>,

    /// Completed events not yet handed out
    ready: VecDeque<RawEvent>,
    unplaced: Option<UnplacedMapping>,
    deferred_error: Option<EngineError>,

    /// yaml-rust2 has reported the end of the stream, or failed
    finished: bool,
}

impl YamlEngine {
    /// Create an engine over an in-memory document.
    pub fn new(content: &str) -> Self {
        let source = SourceText::new(content);
        let parser = Parser::new(source.chars().to_vec().into_iter());
        Self {
            parser,
            source,
            cursor: 0,
            collections: Vec::new(),
            anchors: HashMap::new(),
            pending_comments: Vec::new(),
            ready: VecDeque::new(),
            unplaced: None,
            deferred_error: None,
            finished: false,
        }
    }

    /// Create an engine over everything `reader` yields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Initialization`] if the input cannot be read or is not
    /// valid UTF-8.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| Error::Initialization {
                message: e.to_string(),
            })?;
        Ok(Self::new(&content))
    }

    fn mark(&self, index: usize) -> Mark {
        let pos = self.source.position(index);
        Mark {
            index: pos.offset,
            line: pos.line,
            column: pos.column,
        }
    }

    fn scan_error(&self, err: &ScanError) -> EngineError {
        EngineError {
            problem: err.info().to_string(),
            mark: Some(self.mark(err.marker().index())),
        }
    }

    /// Pull the next yaml-rust2 event and queue what it completes.
    fn advance(&mut self) -> std::result::Result<(), EngineError> {
        let (event, marker) = loop {
            let (event, marker) = self
                .parser
                .next_token()
                .map_err(|e| self.scan_error(&e))?;
            if !matches!(event, Event::Nothing) {
                break (event, marker);
            }
        };

        if let Some(raw) = self.annotate(event, marker.index()) {
            if let Some(mapping) = self.unplaced.take() {
                self.place(mapping, raw.start_mark.index);
            }
            self.complete(raw);
        }
        Ok(())
    }

    /// Attach comments to `raw` and queue it.
    fn complete(&mut self, mut raw: RawEvent) {
        self.attach_comments(&mut raw);
        self.cursor = self.cursor.max(raw.end_mark.index);

        tracing::trace!(
            kind = ?raw.kind,
            start = raw.start_mark.index,
            end = raw.end_mark.index,
            "engine event"
        );
        self.ready.push_back(raw);
    }

    /// Build the [`RawEvent`] for a yaml-rust2 event.
    ///
    /// Returns `None` for a mapping start that has to wait for its first key.
    fn annotate(&mut self, event: Event, index: usize) -> Option<RawEvent> {
        let raw = match event {
            Event::Nothing | Event::StreamStart => {
                RawEvent::new(RawEventKind::StreamStart, self.mark(index), self.mark(index))
            }
            Event::StreamEnd => {
                self.finished = true;
                RawEvent::new(RawEventKind::StreamEnd, self.mark(index), self.mark(index))
            }
            Event::DocumentStart => self.document_start(index),
            Event::DocumentEnd => {
                let explicit = self.source.has_document_marker(index, "...");
                self.document_boundary(RawEventKind::DocumentEnd, index, explicit)
            }
            Event::Alias(id) => self.alias(id, index),
            Event::Scalar(value, style, anchor_id, tag) => {
                self.scalar(value, style, anchor_id, tag, index)
            }
            Event::SequenceStart(anchor_id, tag) => {
                self.collection_start(RawEventKind::SequenceStart, '[', anchor_id, tag, index)?
            }
            Event::MappingStart(anchor_id, tag) => {
                self.collection_start(RawEventKind::MappingStart, '{', anchor_id, tag, index)?
            }
            Event::SequenceEnd => self.collection_end(RawEventKind::SequenceEnd, ']', index),
            Event::MappingEnd => self.collection_end(RawEventKind::MappingEnd, '}', index),
        };
        Some(raw)
    }

    /// An implicit document starts where its content does, which can be
    /// before the marker yaml-rust2 reports (the `:` of a first key).
    fn document_start(&mut self, index: usize) -> RawEvent {
        if self.source.has_document_marker(index, "---") {
            return self.document_boundary(RawEventKind::DocumentStart, index, true);
        }
        let content = annotate::content_start(&self.source, self.cursor);
        self.document_boundary(RawEventKind::DocumentStart, content.min(index), false)
    }

    fn document_boundary(&mut self, kind: RawEventKind, index: usize, explicit: bool) -> RawEvent {
        let end = if explicit { index + 3 } else { index };
        let mut raw = RawEvent::new(kind, self.mark(index), self.mark(end));
        raw.implicit = !explicit;
        raw
    }

    fn alias(&mut self, id: usize, index: usize) -> RawEvent {
        let (anchor, end) = annotate::alias_name(&self.source, index).unwrap_or_else(|| {
            let name = self.anchors.get(&id).cloned().unwrap_or_default();
            (name, index)
        });
        let mut raw = RawEvent::new(RawEventKind::Alias, self.mark(index), self.mark(end));
        raw.anchor = anchor;
        raw
    }

    /// Recover the properties written in front of the node at `index` and
    /// remember its anchor name for later aliases.
    fn properties(&mut self, anchor_id: usize, has_tag: bool, index: usize) -> Properties {
        let count = usize::from(anchor_id != 0) + usize::from(has_tag);
        let props = annotate::node_properties(&self.source, index, self.cursor, count);
        if anchor_id != 0 {
            match &props.anchor {
                Some(name) => {
                    self.anchors.insert(anchor_id, name.clone());
                }
                None => tracing::warn!(anchor_id, index, "could not recover anchor name"),
            }
        }
        props
    }

    fn scalar(
        &mut self,
        mut value: String,
        style: TScalarStyle,
        anchor_id: usize,
        tag: Option<Tag>,
        index: usize,
    ) -> RawEvent {
        let style = scalar_style(style);

        // Block scalars are marked at their first content line, not at the header
        let head = match style {
            RawStyle::Literal | RawStyle::Folded => {
                annotate::block_indicator(&self.source, self.cursor, index + 1)
                    .unwrap_or(index)
            }
            _ => index,
        };
        let props = self.properties(anchor_id, tag.is_some(), head);
        let tag = tag.map(|t| tag_text(&t)).unwrap_or_default();

        // yaml-rust2 reports an empty node as a plain "~"
        if style == RawStyle::Plain && value == "~" && self.source.char_at(index) != Some('~') {
            value.clear();
        }

        let extent = annotate::scalar_extent(&self.source, head, style, &value);
        let mut raw = RawEvent::new(
            RawEventKind::Scalar,
            self.mark(props.start),
            self.mark(extent.end.max(props.end)),
        );
        raw.implicit = (tag.is_empty() && style == RawStyle::Plain) || tag == "!";
        raw.value = value;
        raw.anchor = props.anchor.unwrap_or_default();
        raw.tag = tag;
        raw.style = style;
        raw.line_comment = extent.header_comment;
        raw
    }

    /// Returns `None` when the collection is a mapping without braces, which
    /// is parked until [`place`](Self::place) can position it.
    fn collection_start(
        &mut self,
        kind: RawEventKind,
        opener: char,
        anchor_id: usize,
        tag: Option<Tag>,
        index: usize,
    ) -> Option<RawEvent> {
        let bracketed = self.source.char_at(index) == Some(opener);
        let in_flow = self
            .collections
            .last()
            .is_some_and(|open| open.style == RawStyle::Flow);
        let style = if bracketed || in_flow {
            RawStyle::Flow
        } else {
            RawStyle::Block
        };
        self.collections.push(OpenCollection { style, bracketed });

        let has_tag = tag.is_some();
        let mut raw = RawEvent::new(kind, self.mark(index), self.mark(index));
        raw.tag = tag.map(|t| tag_text(&t)).unwrap_or_default();
        raw.implicit = raw.tag.is_empty();
        raw.style = style;

        if kind == RawEventKind::MappingStart && !bracketed {
            // A complex key (`? a: 1`) opens a second mapping before the first key
            if let Some(outer) = self.unplaced.take() {
                self.place(outer, index);
            }
            self.unplaced = Some(UnplacedMapping {
                raw,
                anchor_id,
                has_tag,
                marker: index,
            });
            return None;
        }

        let props = self.properties(anchor_id, has_tag, index);
        let end = if bracketed { index + 1 } else { index };
        raw.start_mark = self.mark(props.start);
        raw.end_mark = self.mark(end);
        raw.anchor = props.anchor.unwrap_or_default();
        Some(raw)
    }

    /// Position a parked mapping start in front of the event that starts at
    /// `next_start`, and complete it.
    ///
    /// The mapping's own properties are the ones left in front of its first
    /// key once the key has taken its own.
    fn place(&mut self, mapping: UnplacedMapping, next_start: usize) {
        let UnplacedMapping {
            mut raw,
            anchor_id,
            has_tag,
            marker,
        } = mapping;
        let props = self.properties(anchor_id, has_tag, marker.min(next_start));
        raw.start_mark = self.mark(props.start);
        raw.end_mark = self.mark(props.end);
        raw.anchor = props.anchor.unwrap_or_default();
        self.complete(raw);
    }

    fn collection_end(&mut self, kind: RawEventKind, closer: char, index: usize) -> RawEvent {
        let bracketed = self.collections.pop().is_some_and(|open| open.bracketed);
        let end = if bracketed && self.source.char_at(index) == Some(closer) {
            index + 1
        } else {
            index
        };
        RawEvent::new(kind, self.mark(index), self.mark(end))
    }

    /// Attach the comments between the previous event and `raw`.
    ///
    /// A trailing comment on the line where the last queued event ends
    /// becomes its line comment. Full-line comments accumulate until a node
    /// (head), a collection or document end (foot) or the stream end (tail)
    /// takes them.
    fn attach_comments(&mut self, raw: &mut RawEvent) {
        let start = raw.start_mark.index;
        if start > self.cursor {
            let comments = annotate::comments_between(&self.source, self.cursor, start);
            for Comment {
                line,
                full_line,
                text,
            } in comments
            {
                let previous = self
                    .ready
                    .back_mut()
                    .filter(|previous| previous.line_comment.is_none());
                match previous {
                    Some(previous)
                        if !full_line && line == last_line(&self.source, &*previous) =>
                    {
                        previous.line_comment = Some(text);
                    }
                    _ => self.pending_comments.push(text),
                }
            }
        }

        if self.pending_comments.is_empty() {
            return;
        }
        let slot = match raw.kind {
            RawEventKind::Scalar
            | RawEventKind::Alias
            | RawEventKind::SequenceStart
            | RawEventKind::MappingStart => &mut raw.head_comment,
            RawEventKind::SequenceEnd | RawEventKind::MappingEnd | RawEventKind::DocumentEnd => {
                &mut raw.foot_comment
            }
            RawEventKind::StreamEnd => &mut raw.tail_comment,
            RawEventKind::StreamStart | RawEventKind::DocumentStart => return,
        };
        *slot = Some(self.pending_comments.join("\n"));
        self.pending_comments.clear();
    }
}

impl Engine for YamlEngine {
    fn parse(&mut self) -> std::result::Result<Option<RawEvent>, EngineError> {
        loop {
            // The newest event waits for its successor, which may reveal a
            // line comment for it, unless nothing more will come
            let stopped = self.finished || self.deferred_error.is_some();
            if self.ready.len() > 1 || (stopped && !self.ready.is_empty()) {
                return Ok(self.ready.pop_front());
            }
            if let Some(err) = self.deferred_error.take() {
                self.finished = true;
                return Err(err);
            }
            if self.finished {
                return Ok(None);
            }
            if let Err(err) = self.advance() {
                self.deferred_error = Some(err);
            }
        }
    }
}

/// Line on which `raw` visibly ends.
fn last_line(source: &SourceText, raw: &RawEvent) -> usize {
    let (start, end) = (raw.start_mark.index, raw.end_mark.index);
    if end > start {
        source.line_of(end - 1)
    } else {
        source.line_of(end)
    }
}

#[allow(unreachable_patterns)]
fn scalar_style(style: TScalarStyle) -> RawStyle {
    match style {
        TScalarStyle::Plain => RawStyle::Plain,
        TScalarStyle::SingleQuoted => RawStyle::SingleQuoted,
        TScalarStyle::DoubleQuoted => RawStyle::DoubleQuoted,
        TScalarStyle::Literal => RawStyle::Literal,
        TScalarStyle::Folded => RawStyle::Folded,
        _ => RawStyle::Any,
    }
}

fn tag_text(tag: &Tag) -> String {
    format!("{}{}", tag.handle, tag.suffix)
}
