//! Pull parser that turns engine records into public [`Event`]s.

use crate::engine::{Engine, EngineError, Mark, RawEvent, RawEventKind, RawStyle, YamlEngine};
use crate::event::{
    CollectionStyle, Comments, Event, EventData, NodeProperties, Position, ScalarStyle,
};
use crate::{Error, Result};
use std::io::Read;

/// Pull-based YAML event parser.
///
/// Owns its engine for its whole lifetime. Call [`next_event`] until it
/// returns `Ok(None)`, then [`close`]. Dropping the parser releases the
/// engine as well, so early returns on error still clean up.
///
/// # Example
///
/// ```rust
/// use yaml_event_stream::{EventKind, EventParser};
///
/// let mut parser = EventParser::new("a: 1\n");
/// let mut kinds = Vec::new();
/// while let Some(event) = parser.next_event().unwrap() {
///     kinds.push(event.kind());
/// }
/// parser.close();
///
/// assert_eq!(kinds.first(), Some(&EventKind::StreamStart));
/// assert_eq!(kinds.last(), Some(&EventKind::StreamEnd));
/// ```
///
/// [`next_event`]: EventParser::next_event
/// [`close`]: EventParser::close
pub struct EventParser<E: Engine = YamlEngine> {
    engine: Option<E>,
    done: bool,
}

impl EventParser<YamlEngine> {
    /// Parse an in-memory document.
    pub fn new(content: &str) -> Self {
        Self::with_engine(YamlEngine::new(content))
    }

    /// Parse everything `reader` yields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Initialization`] if the input cannot be read or is not
    /// valid UTF-8.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        YamlEngine::from_reader(reader).map(Self::with_engine)
    }
}

impl<E: Engine> EventParser<E> {
    /// Drive `engine` instead of the default yaml-rust2 engine.
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine: Some(engine),
            done: false,
        }
    }

    /// Advance the stream by one event.
    ///
    /// Returns `Ok(None)` once the stream is complete, and on every call after
    /// that. After an error the parser is finished as well.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the engine rejects the input.
    pub fn next_event(&mut self) -> Result<Option<Event>> {
        if self.done {
            return Ok(None);
        }
        let Some(engine) = self.engine.as_mut() else {
            return Ok(None);
        };

        match engine.parse() {
            Ok(Some(raw)) => {
                if raw.kind == RawEventKind::StreamEnd {
                    self.done = true;
                    tracing::debug!("YAML stream complete");
                }
                Ok(Some(translate(raw)))
            }
            Ok(None) => {
                self.done = true;
                tracing::debug!("YAML engine exhausted");
                Ok(None)
            }
            Err(err) => {
                self.done = true;
                Err(parse_error(err))
            }
        }
    }

    /// Whether the stream has completed or failed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Release the engine.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.engine.take().is_some() {
            tracing::debug!("YAML engine released");
        }
    }
}

impl<E: Engine> Drop for EventParser<E> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<E: Engine> Iterator for EventParser<E> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event().transpose()
    }
}

impl<E: Engine> std::iter::FusedIterator for EventParser<E> {}

fn position(mark: Mark) -> Position {
    Position {
        offset: mark.index,
        line: mark.line,
        column: mark.column,
    }
}

fn parse_error(err: EngineError) -> Error {
    Error::Parse {
        message: err.problem,
        position: err.mark.map(position),
    }
}

fn scalar_style(style: RawStyle) -> ScalarStyle {
    match style {
        RawStyle::Plain => ScalarStyle::Plain,
        RawStyle::SingleQuoted => ScalarStyle::SingleQuoted,
        RawStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
        RawStyle::Literal => ScalarStyle::Literal,
        RawStyle::Folded => ScalarStyle::Folded,
        RawStyle::Any | RawStyle::Block | RawStyle::Flow => ScalarStyle::Any,
    }
}

fn collection_style(style: RawStyle) -> CollectionStyle {
    match style {
        RawStyle::Block => CollectionStyle::Block,
        RawStyle::Flow => CollectionStyle::Flow,
        _ => CollectionStyle::Any,
    }
}

/// Convert an engine record into a public event.
///
/// Only the fields that belong to the record's kind are carried over;
/// position and comments are copied for every kind.
fn translate(raw: RawEvent) -> Event {
    let RawEvent {
        kind,
        start_mark,
        end_mark,
        value,
        anchor,
        tag,
        implicit,
        style,
        head_comment,
        line_comment,
        foot_comment,
        tail_comment,
    } = raw;

    let data = match kind {
        RawEventKind::StreamStart => EventData::StreamStart,
        RawEventKind::StreamEnd => EventData::StreamEnd,
        RawEventKind::DocumentStart => EventData::DocumentStart { implicit },
        RawEventKind::DocumentEnd => EventData::DocumentEnd { implicit },
        RawEventKind::Alias => EventData::Alias { anchor },
        RawEventKind::Scalar => EventData::Scalar {
            value,
            properties: NodeProperties {
                anchor,
                tag,
                implicit,
            },
            style: scalar_style(style),
        },
        RawEventKind::SequenceStart => EventData::SequenceStart {
            properties: NodeProperties {
                anchor,
                tag,
                implicit,
            },
            style: collection_style(style),
        },
        RawEventKind::SequenceEnd => EventData::SequenceEnd,
        RawEventKind::MappingStart => EventData::MappingStart {
            properties: NodeProperties {
                anchor,
                tag,
                implicit,
            },
            style: collection_style(style),
        },
        RawEventKind::MappingEnd => EventData::MappingEnd,
    };

    Event::new(
        data,
        position(start_mark),
        position(end_mark),
        Comments {
            head: head_comment,
            line: line_comment,
            foot: foot_comment,
            tail: tail_comment,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, Style};
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Engine that replays a fixed script and counts how often it is dropped.
    struct ScriptedEngine {
        script: VecDeque<std::result::Result<Option<RawEvent>, EngineError>>,
        drops: Rc<Cell<usize>>,
    }

    impl ScriptedEngine {
        fn new(
            script: Vec<std::result::Result<Option<RawEvent>, EngineError>>,
        ) -> (Self, Rc<Cell<usize>>) {
            let drops = Rc::new(Cell::new(0));
            let engine = Self {
                script: script.into(),
                drops: Rc::clone(&drops),
            };
            (engine, drops)
        }
    }

    impl Engine for ScriptedEngine {
        fn parse(&mut self) -> std::result::Result<Option<RawEvent>, EngineError> {
            self.script
                .pop_front()
                .unwrap_or_else(|| panic!("engine called after its script ended"))
        }
    }

    impl Drop for ScriptedEngine {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn mark(index: usize) -> Mark {
        Mark {
            index,
            line: 0,
            column: index,
        }
    }

    fn raw(kind: RawEventKind) -> RawEvent {
        RawEvent::new(kind, mark(0), mark(0))
    }

    #[test]
    fn test_translate_scalar() {
        let mut scalar = RawEvent::new(RawEventKind::Scalar, mark(2), mark(7));
        scalar.value = "hello".into();
        scalar.anchor = "a".into();
        scalar.tag = "!t".into();
        scalar.style = RawStyle::DoubleQuoted;
        scalar.head_comment = Some("above".into());

        let event = translate(scalar);
        assert_eq!(event.kind(), EventKind::Scalar);
        assert_eq!(event.value(), "hello");
        assert_eq!(event.anchor(), "a");
        assert_eq!(event.tag(), "!t");
        assert!(!event.implicit());
        assert_eq!(event.style(), Style::Scalar(ScalarStyle::DoubleQuoted));
        assert_eq!(event.start().offset, 2);
        assert_eq!(event.end().column, 7);
        assert_eq!(event.comments().head.as_deref(), Some("above"));
        assert_eq!(event.comments().line, None);
    }

    #[test]
    fn test_translate_drops_fields_foreign_to_kind() {
        let mut end = raw(RawEventKind::SequenceEnd);
        end.anchor = "stray".into();
        end.value = "stray".into();
        end.implicit = true;
        end.style = RawStyle::Flow;
        end.foot_comment = Some("kept".into());

        let event = translate(end);
        assert_eq!(event.anchor(), "");
        assert_eq!(event.value(), "");
        assert!(!event.implicit());
        assert_eq!(event.style(), Style::NotApplicable);
        assert_eq!(event.comments().foot.as_deref(), Some("kept"));
    }

    #[test]
    fn test_style_resolution_per_kind() {
        let mut scalar = raw(RawEventKind::Scalar);
        scalar.style = RawStyle::Flow;
        assert_eq!(translate(scalar).style(), Style::Scalar(ScalarStyle::Any));

        let mut seq = raw(RawEventKind::SequenceStart);
        seq.style = RawStyle::Literal;
        assert_eq!(translate(seq).style(), Style::Sequence(CollectionStyle::Any));

        let mut map = raw(RawEventKind::MappingStart);
        map.style = RawStyle::Flow;
        assert_eq!(translate(map).style(), Style::Mapping(CollectionStyle::Flow));

        let mut doc = raw(RawEventKind::DocumentStart);
        doc.style = RawStyle::Block;
        assert_eq!(translate(doc).style(), Style::NotApplicable);
    }

    #[test]
    fn test_stream_end_is_idempotent() {
        let (engine, _) = ScriptedEngine::new(vec![
            Ok(Some(raw(RawEventKind::StreamStart))),
            Ok(Some(raw(RawEventKind::StreamEnd))),
        ]);
        let mut parser = EventParser::with_engine(engine);
        assert_eq!(
            parser.next_event().unwrap().map(|e| e.kind()),
            Some(EventKind::StreamStart)
        );
        assert_eq!(
            parser.next_event().unwrap().map(|e| e.kind()),
            Some(EventKind::StreamEnd)
        );
        // The script is empty: any further engine call would panic
        for _ in 0..5 {
            assert_eq!(parser.next_event(), Ok(None));
        }
        assert!(parser.is_done());
    }

    #[test]
    fn test_benign_exhaustion() {
        let (engine, _) = ScriptedEngine::new(vec![
            Ok(Some(raw(RawEventKind::StreamStart))),
            Ok(None),
        ]);
        let mut parser = EventParser::with_engine(engine);
        assert!(parser.next_event().unwrap().is_some());
        assert_eq!(parser.next_event(), Ok(None));
        assert_eq!(parser.next_event(), Ok(None));
    }

    #[test]
    fn test_engine_error_is_terminal() {
        let (engine, _) = ScriptedEngine::new(vec![
            Ok(Some(raw(RawEventKind::StreamStart))),
            Err(EngineError {
                problem: "found unexpected end of stream".into(),
                mark: Some(Mark {
                    index: 9,
                    line: 1,
                    column: 3,
                }),
            }),
        ]);
        let mut parser = EventParser::with_engine(engine);
        assert!(parser.next_event().unwrap().is_some());

        let err = parser.next_event().unwrap_err();
        assert_eq!(
            err,
            Error::Parse {
                message: "found unexpected end of stream".into(),
                position: Some(Position {
                    offset: 9,
                    line: 1,
                    column: 3
                }),
            }
        );
        assert_eq!(parser.next_event(), Ok(None));
    }

    #[test]
    fn test_close_releases_engine_once() {
        let (engine, drops) = ScriptedEngine::new(vec![Ok(Some(raw(RawEventKind::StreamStart)))]);
        let mut parser = EventParser::with_engine(engine);
        parser.next_event().unwrap();
        parser.close();
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_drop_releases_engine_on_early_exit() {
        fn consume(parser: &mut EventParser<ScriptedEngine>) -> Result<usize> {
            let mut count = 0;
            while parser.next_event()?.is_some() {
                count += 1;
            }
            Ok(count)
        }

        let (engine, drops) = ScriptedEngine::new(vec![
            Ok(Some(raw(RawEventKind::StreamStart))),
            Err(EngineError {
                problem: "bad".into(),
                mark: None,
            }),
        ]);
        {
            let mut parser = EventParser::with_engine(engine);
            assert!(consume(&mut parser).is_err());
            assert_eq!(drops.get(), 0);
        }
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_iterator_yields_events_then_stops() {
        let (engine, _) = ScriptedEngine::new(vec![
            Ok(Some(raw(RawEventKind::StreamStart))),
            Ok(Some(raw(RawEventKind::StreamEnd))),
        ]);
        let kinds: Vec<EventKind> = EventParser::with_engine(engine)
            .map(|event| event.map(|e| e.kind()))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(kinds, vec![EventKind::StreamStart, EventKind::StreamEnd]);
    }
}
