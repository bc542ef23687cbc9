//! Public event vocabulary.
//!
//! An [`Event`] is one normalized record of the parsed stream: a kind, the
//! source extent it covers, the comments the engine attached to it, and a
//! kind-dependent payload. The payload lives in [`EventData`], so an event can
//! only carry the fields that make sense for its kind. The flat accessors
//! (`value()`, `anchor()`, ...) return empty defaults for the rest.

use serde::Serialize;
use std::fmt;

/// Kind of a parser event.
///
/// Ordered roughly by stream lifecycle. `None` only appears as the default
/// value and never on an event produced by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    #[default]
    None,
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    Alias,
    Scalar,
    SequenceStart,
    SequenceEnd,
    MappingStart,
    MappingEnd,
}

impl EventKind {
    /// Display name used in rendered traces.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::None => "NONE",
            EventKind::StreamStart => "STREAM-START",
            EventKind::StreamEnd => "STREAM-END",
            EventKind::DocumentStart => "DOCUMENT-START",
            EventKind::DocumentEnd => "DOCUMENT-END",
            EventKind::Alias => "ALIAS",
            EventKind::Scalar => "SCALAR",
            EventKind::SequenceStart => "SEQUENCE-START",
            EventKind::SequenceEnd => "SEQUENCE-END",
            EventKind::MappingStart => "MAPPING-START",
            EventKind::MappingEnd => "MAPPING-END",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A location in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Position {
    /// Character index from the start of the input (0-based)
    pub offset: usize,

    /// Line number (0-based)
    pub line: usize,

    /// Column number (0-based, in characters)
    pub column: usize,
}

/// Presentation style of a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalarStyle {
    /// Style unspecified
    #[default]
    Any,
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl ScalarStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarStyle::Any => "any",
            ScalarStyle::Plain => "plain",
            ScalarStyle::SingleQuoted => "single-quoted",
            ScalarStyle::DoubleQuoted => "double-quoted",
            ScalarStyle::Literal => "literal",
            ScalarStyle::Folded => "folded",
        }
    }
}

/// Presentation style of a sequence or mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionStyle {
    /// Style unspecified
    #[default]
    Any,
    /// Indentation-based
    Block,
    /// Bracketed (`[...]`, `{...}`)
    Flow,
}

impl CollectionStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionStyle::Any => "any",
            CollectionStyle::Block => "block",
            CollectionStyle::Flow => "flow",
        }
    }
}

/// Style of an event, resolved against its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    /// The event kind has no style (structural ends, aliases, stream and
    /// document boundaries)
    #[default]
    NotApplicable,
    Scalar(ScalarStyle),
    Sequence(CollectionStyle),
    Mapping(CollectionStyle),
}

impl Style {
    /// Human-readable name; empty when not applicable.
    pub fn as_str(self) -> &'static str {
        match self {
            Style::NotApplicable => "",
            Style::Scalar(style) => style.as_str(),
            Style::Sequence(style) | Style::Mapping(style) => style.as_str(),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comments attached to an event.
///
/// `None` means the engine attached nothing to that slot, while `Some("")`
/// means it attached an empty comment. Slots are independent of each other.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Comments {
    /// Comment lines directly above the node
    pub head: Option<String>,

    /// Comment on the same line, after the node
    pub line: Option<String>,

    /// Comment lines closing a collection or document
    pub foot: Option<String>,

    /// Comment lines left over at the end of the stream
    pub tail: Option<String>,
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        self.head.is_none() && self.line.is_none() && self.foot.is_none() && self.tail.is_none()
    }

    /// Present slots in rendering order, with their labels.
    pub fn labeled(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("HeadComment", self.head.as_deref()),
            ("LineComment", self.line.as_deref()),
            ("FootComment", self.foot.as_deref()),
            ("TailComment", self.tail.as_deref()),
        ]
    }
}

/// Anchor, tag and implicit flag shared by scalars and collection starts.
///
/// Empty strings mean "no anchor" / "no explicit tag".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NodeProperties {
    pub anchor: String,
    pub tag: String,
    pub implicit: bool,
}

/// Kind-dependent payload of an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EventData {
    StreamStart,
    StreamEnd,
    DocumentStart {
        implicit: bool,
    },
    DocumentEnd {
        implicit: bool,
    },
    Alias {
        anchor: String,
    },
    Scalar {
        value: String,
        properties: NodeProperties,
        style: ScalarStyle,
    },
    SequenceStart {
        properties: NodeProperties,
        style: CollectionStyle,
    },
    SequenceEnd,
    MappingStart {
        properties: NodeProperties,
        style: CollectionStyle,
    },
    MappingEnd,
}

impl EventData {
    pub fn kind(&self) -> EventKind {
        match self {
            EventData::StreamStart => EventKind::StreamStart,
            EventData::StreamEnd => EventKind::StreamEnd,
            EventData::DocumentStart { .. } => EventKind::DocumentStart,
            EventData::DocumentEnd { .. } => EventKind::DocumentEnd,
            EventData::Alias { .. } => EventKind::Alias,
            EventData::Scalar { .. } => EventKind::Scalar,
            EventData::SequenceStart { .. } => EventKind::SequenceStart,
            EventData::SequenceEnd => EventKind::SequenceEnd,
            EventData::MappingStart { .. } => EventKind::MappingStart,
            EventData::MappingEnd => EventKind::MappingEnd,
        }
    }

    fn properties(&self) -> Option<&NodeProperties> {
        match self {
            EventData::Scalar { properties, .. }
            | EventData::SequenceStart { properties, .. }
            | EventData::MappingStart { properties, .. } => Some(properties),
            _ => None,
        }
    }
}

/// One event of the parsed stream.
///
/// Events are immutable once produced and own all of their text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    data: EventData,
    start: Position,
    end: Position,
    comments: Comments,
}

impl Event {
    pub fn new(data: EventData, start: Position, end: Position, comments: Comments) -> Self {
        Self {
            data,
            start,
            end,
            comments,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.data.kind()
    }

    pub fn data(&self) -> &EventData {
        &self.data
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn comments(&self) -> &Comments {
        &self.comments
    }

    /// Scalar content; empty for every other kind.
    pub fn value(&self) -> &str {
        match &self.data {
            EventData::Scalar { value, .. } => value,
            _ => "",
        }
    }

    /// Anchor name of an anchored node, or the target of an alias.
    pub fn anchor(&self) -> &str {
        match &self.data {
            EventData::Alias { anchor } => anchor,
            data => data.properties().map_or("", |p| p.anchor.as_str()),
        }
    }

    pub fn tag(&self) -> &str {
        self.data.properties().map_or("", |p| p.tag.as_str())
    }

    /// Whether the document boundary or node type was inferred rather than
    /// written out.
    pub fn implicit(&self) -> bool {
        match &self.data {
            EventData::DocumentStart { implicit } | EventData::DocumentEnd { implicit } => {
                *implicit
            }
            data => data.properties().is_some_and(|p| p.implicit),
        }
    }

    pub fn style(&self) -> Style {
        match &self.data {
            EventData::Scalar { style, .. } => Style::Scalar(*style),
            EventData::SequenceStart { style, .. } => Style::Sequence(*style),
            EventData::MappingStart { style, .. } => Style::Mapping(*style),
            _ => Style::NotApplicable,
        }
    }
}
