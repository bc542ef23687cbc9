//! The parsing engine behind [`EventParser`](crate::EventParser).
//!
//! The parser does not scan or parse YAML itself. It pulls [`RawEvent`]
//! records from an [`Engine`] and normalizes them. [`YamlEngine`] is the
//! engine used by default; other engines (or scripted ones in tests) can be
//! plugged in through [`EventParser::with_engine`](crate::EventParser::with_engine).
//!
//! Dropping an engine releases everything it holds.

mod annotate;
mod yaml;

pub use yaml::YamlEngine;

/// Engine-side event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEventKind {
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

/// Engine-side style discriminator.
///
/// The engine reports one flat code whatever the event kind; the parser
/// decides what it means for each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawStyle {
    #[default]
    Any,
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
    Block,
    Flow,
}

/// Engine-side position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mark {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

/// One event as produced by an engine.
///
/// Which fields are filled depends on `kind`; the rest are left at their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: RawEventKind,
    pub start_mark: Mark,
    pub end_mark: Mark,
    pub value: String,
    pub anchor: String,
    pub tag: String,
    pub implicit: bool,
    pub style: RawStyle,
    pub head_comment: Option<String>,
    pub line_comment: Option<String>,
    pub foot_comment: Option<String>,
    pub tail_comment: Option<String>,
}

impl RawEvent {
    /// An event of `kind` spanning `start_mark..end_mark` with no payload.
    pub fn new(kind: RawEventKind, start_mark: Mark, end_mark: Mark) -> Self {
        Self {
            kind,
            start_mark,
            end_mark,
            value: String::new(),
            anchor: String::new(),
            tag: String::new(),
            implicit: false,
            style: RawStyle::Any,
            head_comment: None,
            line_comment: None,
            foot_comment: None,
            tail_comment: None,
        }
    }
}

/// A hard failure reported by an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    pub problem: String,
    pub mark: Option<Mark>,
}

/// A pull-based source of [`RawEvent`]s.
pub trait Engine {
    /// Produce the next event.
    ///
    /// `Ok(None)` signals that the stream is exhausted without error. After an
    /// `Err`, the engine must not be asked for more events.
    fn parse(&mut self) -> Result<Option<RawEvent>, EngineError>;
}
