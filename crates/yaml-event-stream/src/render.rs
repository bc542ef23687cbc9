//! Human-readable rendering of events.
//!
//! Each event becomes one YAML-list-like block followed by a blank line.
//! The format is meant for reading, not for parsing back:
//!
//! ```text
//! - Event: SCALAR
//!   Start: {Line: 1, Column: 3}
//!   End: {Line: 1, Column: 4}
//!   Value: "1"
//!   Implicit: true
//! ```
//!
//! Lines are shown 1-based and columns 0-based. Values and comments are
//! double-quoted with C-style escapes; control characters without a short
//! escape are written as `\xNN` (C0 and DEL) or `\uXXXX`.

use crate::event::{Event, EventData, NodeProperties, Position, Style};
use std::io::{self, Write};

/// Write the block for `event` to `out`.
pub fn write_event<W: Write + ?Sized>(out: &mut W, event: &Event) -> io::Result<()> {
    writeln!(out, "- Event: {}", event.kind())?;
    write_position(out, "Start", event.start())?;
    write_position(out, "End", event.end())?;

    for (label, text) in event.comments().labeled() {
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            writeln!(out, "  {label}: {}", quote(text))?;
        }
    }

    match event.data() {
        EventData::Scalar {
            value, properties, ..
        } => {
            writeln!(out, "  Value: {}", quote(value))?;
            write_properties(out, event.style(), "plain", properties)?;
        }
        EventData::Alias { anchor } => {
            writeln!(out, "  Anchor: {anchor}")?;
        }
        EventData::SequenceStart { properties, .. }
        | EventData::MappingStart { properties, .. } => {
            write_properties(out, event.style(), "block", properties)?;
        }
        EventData::DocumentStart { implicit } | EventData::DocumentEnd { implicit } => {
            writeln!(out, "  Implicit: {implicit}")?;
        }
        EventData::StreamStart
        | EventData::StreamEnd
        | EventData::SequenceEnd
        | EventData::MappingEnd => {}
    }

    writeln!(out)
}

/// Render `event` to a `String`.
pub fn render_event(event: &Event) -> String {
    let mut buf = Vec::new();
    write_event(&mut buf, event).expect("writing to a Vec cannot fail");
    String::from_utf8(buf).expect("rendered events are UTF-8")
}

/// Double-quote `text`, escaping quotes, backslashes and control
/// characters.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\u{7}' => quoted.push_str("\\a"),
            '\u{8}' => quoted.push_str("\\b"),
            '\u{c}' => quoted.push_str("\\f"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\u{b}' => quoted.push_str("\\v"),
            '\0'..='\u{1f}' | '\u{7f}' => {
                quoted.push_str(&format!("\\x{:02x}", u32::from(ch)));
            }
            ch if ch.is_control() => {
                let code = u32::from(ch);
                if code > 0xffff {
                    quoted.push_str(&format!("\\U{code:08x}"));
                } else {
                    quoted.push_str(&format!("\\u{code:04x}"));
                }
            }
            ch => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

fn write_position<W: Write + ?Sized>(out: &mut W, label: &str, pos: Position) -> io::Result<()> {
    writeln!(
        out,
        "  {label}: {{Line: {}, Column: {}}}",
        pos.line + 1,
        pos.column
    )
}

/// Style (unless it is the kind's default), tag, anchor and implicit flag.
fn write_properties<W: Write + ?Sized>(
    out: &mut W,
    style: Style,
    default_style: &str,
    properties: &NodeProperties,
) -> io::Result<()> {
    let style = style.as_str();
    if !style.is_empty() && style != default_style {
        writeln!(out, "  Style: {style}")?;
    }
    if !properties.tag.is_empty() {
        writeln!(out, "  Tag: {}", properties.tag)?;
    }
    if !properties.anchor.is_empty() {
        writeln!(out, "  Anchor: {}", properties.anchor)?;
    }
    writeln!(out, "  Implicit: {}", properties.implicit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{CollectionStyle, Comments, ScalarStyle};

    fn pos(offset: usize, line: usize, column: usize) -> Position {
        Position {
            offset,
            line,
            column,
        }
    }

    fn plain(data: EventData) -> Event {
        Event::new(data, pos(0, 0, 0), pos(0, 0, 0), Comments::default())
    }

    #[test]
    fn test_render_stream_start() {
        assert_eq!(
            render_event(&plain(EventData::StreamStart)),
            "- Event: STREAM-START\n  Start: {Line: 1, Column: 0}\n  End: {Line: 1, Column: 0}\n\n"
        );
    }

    #[test]
    fn test_render_plain_scalar_hides_default_style() {
        let event = Event::new(
            EventData::Scalar {
                value: "1".into(),
                properties: NodeProperties {
                    implicit: true,
                    ..NodeProperties::default()
                },
                style: ScalarStyle::Plain,
            },
            pos(3, 0, 3),
            pos(4, 0, 4),
            Comments::default(),
        );
        assert_eq!(
            render_event(&event),
            "- Event: SCALAR\n\
             \x20 Start: {Line: 1, Column: 3}\n\
             \x20 End: {Line: 1, Column: 4}\n\
             \x20 Value: \"1\"\n\
             \x20 Implicit: true\n\
             \n"
        );
    }

    #[test]
    fn test_render_quoted_scalar_with_properties() {
        let event = Event::new(
            EventData::Scalar {
                value: "a\tb\n".into(),
                properties: NodeProperties {
                    anchor: "x".into(),
                    tag: "!t".into(),
                    implicit: false,
                },
                style: ScalarStyle::DoubleQuoted,
            },
            pos(5, 1, 2),
            pos(14, 1, 11),
            Comments {
                head: Some("above".into()),
                line: Some("beside".into()),
                ..Comments::default()
            },
        );
        let rendered = render_event(&event);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "- Event: SCALAR",
                "  Start: {Line: 2, Column: 2}",
                "  End: {Line: 2, Column: 11}",
                "  HeadComment: \"above\"",
                "  LineComment: \"beside\"",
                "  Value: \"a\\tb\\n\"",
                "  Style: double-quoted",
                "  Tag: !t",
                "  Anchor: x",
                "  Implicit: false",
                "",
            ]
        );
    }

    #[test]
    fn test_quote_escapes_control_characters() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("say \"hi\"\\"), r#""say \"hi\"\\""#);
        assert_eq!(quote("a\tb\n\r"), r#""a\tb\n\r""#);
        assert_eq!(quote("\u{7}\u{8}\u{b}\u{c}"), r#""\a\b\v\f""#);
        assert_eq!(quote("é\u{1}"), r#""é\x01""#);
        assert_eq!(quote("\0\u{1b}\u{7f}"), r#""\x00\x1b\x7f""#);
        assert_eq!(quote("\u{85}"), r#""\u0085""#);
        assert_eq!(quote("snow ☃ 🦀"), "\"snow ☃ 🦀\"");
    }

    #[test]
    fn test_render_skips_empty_comments() {
        let event = Event::new(
            EventData::MappingEnd,
            pos(0, 0, 0),
            pos(0, 0, 0),
            Comments {
                foot: Some(String::new()),
                tail: Some("end".into()),
                ..Comments::default()
            },
        );
        let rendered = render_event(&event);
        assert!(!rendered.contains("FootComment"));
        assert!(rendered.contains("  TailComment: \"end\"\n"));
    }

    #[test]
    fn test_render_collection_styles() {
        let block = plain(EventData::MappingStart {
            properties: NodeProperties {
                implicit: true,
                ..NodeProperties::default()
            },
            style: CollectionStyle::Block,
        });
        let rendered = render_event(&block);
        assert!(!rendered.contains("Style"));
        assert!(rendered.ends_with("  Implicit: true\n\n"));

        let flow = plain(EventData::SequenceStart {
            properties: NodeProperties {
                anchor: "s".into(),
                ..NodeProperties::default()
            },
            style: CollectionStyle::Flow,
        });
        let rendered = render_event(&flow);
        assert!(rendered.contains("  Style: flow\n  Anchor: s\n  Implicit: false\n"));

        let any = plain(EventData::SequenceStart {
            properties: NodeProperties::default(),
            style: CollectionStyle::Any,
        });
        assert!(render_event(&any).contains("  Style: any\n"));
    }

    #[test]
    fn test_render_alias_always_shows_anchor() {
        let rendered = render_event(&plain(EventData::Alias {
            anchor: String::new(),
        }));
        assert!(rendered.contains("  Anchor: \n"));
    }

    #[test]
    fn test_render_document_boundaries() {
        let rendered = render_event(&plain(EventData::DocumentEnd { implicit: false }));
        assert!(rendered.starts_with("- Event: DOCUMENT-END\n"));
        assert!(rendered.contains("  Implicit: false\n"));
    }

    #[test]
    fn test_render_structural_end_has_no_extras() {
        let rendered = render_event(&plain(EventData::SequenceEnd));
        assert_eq!(rendered.lines().count(), 4);
    }
}
